//! Per-frame biomechanical measurements

use serde::{Deserialize, Serialize};

use super::joints::JointName;

/// Name of a scalar measurement carried by every [`FrameMeasurements`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    ArmAngle,
    WristAngle,
    TrunkAngle,
    FrontKneeAngle,
    BackKneeAngle,
    ShoulderRotation,
    HipAlignment,
    HipShoulderSeparation,
    ReleasePointHeight,
    ReleasePointHorizontal,
}

impl Measurement {
    pub const ALL: [Measurement; 10] = [
        Measurement::ArmAngle,
        Measurement::WristAngle,
        Measurement::TrunkAngle,
        Measurement::FrontKneeAngle,
        Measurement::BackKneeAngle,
        Measurement::ShoulderRotation,
        Measurement::HipAlignment,
        Measurement::HipShoulderSeparation,
        Measurement::ReleasePointHeight,
        Measurement::ReleasePointHorizontal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::ArmAngle => "arm_angle",
            Measurement::WristAngle => "wrist_angle",
            Measurement::TrunkAngle => "trunk_angle",
            Measurement::FrontKneeAngle => "front_knee_angle",
            Measurement::BackKneeAngle => "back_knee_angle",
            Measurement::ShoulderRotation => "shoulder_rotation",
            Measurement::HipAlignment => "hip_alignment",
            Measurement::HipShoulderSeparation => "hip_shoulder_separation",
            Measurement::ReleasePointHeight => "release_point_height",
            Measurement::ReleasePointHorizontal => "release_point_horizontal",
        }
    }
}

/// Left/right pixel coordinates of one joint type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointPair {
    pub left: (f32, f32),
    pub right: (f32, f32),
}

/// Biomechanics of a single frame
///
/// Angles are in degrees, release point is normalized to [0, 1] by the frame
/// size. A frame without a pose has no `FrameMeasurements` at all
/// (`Option::None`), never a record of zeros.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMeasurements {
    /// Shoulder-elbow-wrist of the bowling arm, [0, 360)
    pub arm_angle: f32,
    /// 180 - |arm_angle - 180| (no finger landmarks available)
    pub wrist_angle: f32,
    /// Forward lean of the bowling-side shoulder over the hip
    pub trunk_angle: f32,
    /// Hip-knee-ankle of the non-bowling side
    pub front_knee_angle: f32,
    /// Hip-knee-ankle of the bowling side
    pub back_knee_angle: f32,
    /// Orientation of the shoulder line
    pub shoulder_rotation: f32,
    /// Orientation of the hip line
    pub hip_alignment: f32,
    pub hip_shoulder_separation: f32,
    pub release_point_height: f32,
    pub release_point_horizontal: f32,

    pub shoulders: JointPair,
    pub elbows: JointPair,
    pub wrists: JointPair,

    /// Joints substituted with the (0, 0) sentinel in this frame
    pub fallback_joints: Vec<JointName>,
}

impl FrameMeasurements {
    pub fn get(&self, measurement: Measurement) -> f32 {
        match measurement {
            Measurement::ArmAngle => self.arm_angle,
            Measurement::WristAngle => self.wrist_angle,
            Measurement::TrunkAngle => self.trunk_angle,
            Measurement::FrontKneeAngle => self.front_knee_angle,
            Measurement::BackKneeAngle => self.back_knee_angle,
            Measurement::ShoulderRotation => self.shoulder_rotation,
            Measurement::HipAlignment => self.hip_alignment,
            Measurement::HipShoulderSeparation => self.hip_shoulder_separation,
            Measurement::ReleasePointHeight => self.release_point_height,
            Measurement::ReleasePointHorizontal => self.release_point_horizontal,
        }
    }

    /// All scalar measurements in [`Measurement::ALL`] order
    pub fn scalars(&self) -> impl Iterator<Item = (Measurement, f32)> + '_ {
        Measurement::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// True when no joint fell back to the sentinel
    pub fn is_fully_detected(&self) -> bool {
        self.fallback_joints.is_empty()
    }
}
