//! Joint resolution - confidence gate between detector output and geometry
//!
//! Every joint the extractor asks for resolves to a pixel position. When the
//! landmark is missing, non-finite, or below the confidence threshold the
//! joint falls back to the sentinel (0, 0) and is flagged, so one bad joint
//! never discards an otherwise usable frame. Angles computed from a fallback
//! joint are meaningless; callers check `fallback_joints` on the measurement.

use serde::{Deserialize, Serialize};

use crate::bridge::{
    PoseFrame, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;

/// Position substituted for an undetected joint
pub const FALLBACK_POSITION: (f32, f32) = (0.0, 0.0);

/// Body side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Joint type irrespective of side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointKind {
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

/// Anatomical joint used by the extractor
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    pub fn of(kind: JointKind, side: Side) -> Self {
        use JointKind::*;
        match (kind, side) {
            (Shoulder, Side::Left) => JointName::LeftShoulder,
            (Shoulder, Side::Right) => JointName::RightShoulder,
            (Elbow, Side::Left) => JointName::LeftElbow,
            (Elbow, Side::Right) => JointName::RightElbow,
            (Wrist, Side::Left) => JointName::LeftWrist,
            (Wrist, Side::Right) => JointName::RightWrist,
            (Hip, Side::Left) => JointName::LeftHip,
            (Hip, Side::Right) => JointName::RightHip,
            (Knee, Side::Left) => JointName::LeftKnee,
            (Knee, Side::Right) => JointName::RightKnee,
            (Ankle, Side::Left) => JointName::LeftAnkle,
            (Ankle, Side::Right) => JointName::RightAnkle,
        }
    }

    /// MediaPipe Pose landmark index
    pub fn landmark_index(self) -> usize {
        match self {
            JointName::LeftShoulder => LEFT_SHOULDER,
            JointName::RightShoulder => RIGHT_SHOULDER,
            JointName::LeftElbow => LEFT_ELBOW,
            JointName::RightElbow => RIGHT_ELBOW,
            JointName::LeftWrist => LEFT_WRIST,
            JointName::RightWrist => RIGHT_WRIST,
            JointName::LeftHip => LEFT_HIP,
            JointName::RightHip => RIGHT_HIP,
            JointName::LeftKnee => LEFT_KNEE,
            JointName::RightKnee => RIGHT_KNEE,
            JointName::LeftAnkle => LEFT_ANKLE,
            JointName::RightAnkle => RIGHT_ANKLE,
        }
    }
}

/// A joint position in pixel space plus whether it is a fallback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedJoint {
    pub position: (f32, f32),
    /// True when `position` is the sentinel rather than a detection
    pub fallback: bool,
}

impl ResolvedJoint {
    fn detected(position: (f32, f32)) -> Self {
        Self { position, fallback: false }
    }

    fn undetected() -> Self {
        Self { position: FALLBACK_POSITION, fallback: true }
    }
}

/// Confidence gate for pose landmarks
pub struct JointResolver {
    /// Minimum visibility to accept a landmark
    threshold: f32,
}

impl JointResolver {
    pub fn new() -> Self {
        Self { threshold: DEFAULT_CONFIDENCE_THRESHOLD }
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Resolve a joint to pixel coordinates
    ///
    /// If visibility >= threshold: denormalize by the frame size
    /// Otherwise (or index out of range, or NaN): sentinel (0, 0), flagged
    pub fn resolve(&self, frame: &PoseFrame, joint: JointName) -> ResolvedJoint {
        let index = joint.landmark_index();
        let Some(landmark) = frame.landmark(index) else {
            log::debug!("Landmark {} out of range ({} supplied)", index, frame.landmarks.len());
            return ResolvedJoint::undetected();
        };

        if !(landmark.visibility >= self.threshold) {
            log::debug!("Landmark {} has low visibility ({})", index, landmark.visibility);
            return ResolvedJoint::undetected();
        }

        let position = (landmark.x * frame.width as f32, landmark.y * frame.height as f32);
        if !position.0.is_finite() || !position.1.is_finite() {
            log::debug!("Landmark {} has non-finite coordinates", index);
            return ResolvedJoint::undetected();
        }

        ResolvedJoint::detected(position)
    }
}

impl Default for JointResolver {
    fn default() -> Self {
        Self::new()
    }
}
