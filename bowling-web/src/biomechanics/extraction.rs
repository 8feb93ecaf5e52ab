//! Frame biomechanics extraction
//!
//! Maps one frame of pose landmarks to a [`FrameMeasurements`] record.
//! Measurements are defined for a right-arm bowler. For a left-arm bowler the
//! detected joints are mirrored horizontally first, so both produce the same
//! angles for the same technique.

use super::angles::{angle, bearing};
use super::joints::{JointKind, JointName, JointResolver, ResolvedJoint, Side, FALLBACK_POSITION};
use super::measurements::{FrameMeasurements, JointPair};
use crate::bridge::PoseFrame;
use crate::config::AnalysisConfig;

/// Extracts measurements from single frames
///
/// Holds no per-frame state, so frames can be processed in any order.
pub struct BiomechanicsExtractor {
    resolver: JointResolver,
    dominant_side: Side,
}

/// Resolved joints of one frame, split by bowling/non-bowling side
struct BodyJoints {
    joints: [(JointName, ResolvedJoint); 12],
    dominant: Side,
    width: f32,
}

impl BodyJoints {
    fn resolve(resolver: &JointResolver, frame: &PoseFrame, dominant: Side) -> Self {
        use JointKind::*;
        let kinds = [Shoulder, Elbow, Wrist, Hip, Knee, Ankle];
        let joints = std::array::from_fn(|i| {
            let side = if i % 2 == 0 { Side::Left } else { Side::Right };
            let name = JointName::of(kinds[i / 2], side);
            (name, resolver.resolve(frame, name))
        });
        Self { joints, dominant, width: frame.width as f32 }
    }

    /// Joint in actual frame coordinates
    fn raw(&self, kind: JointKind, side: Side) -> ResolvedJoint {
        let name = JointName::of(kind, side);
        self.joints
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, joint)| *joint)
            .unwrap_or(ResolvedJoint { position: FALLBACK_POSITION, fallback: true })
    }

    /// Joint in right-handed coordinates: mirrored for a left-arm bowler.
    /// Fallback joints keep the sentinel position.
    fn canonical(&self, kind: JointKind, side: Side) -> (f32, f32) {
        let joint = self.raw(kind, side);
        match self.dominant {
            Side::Left if !joint.fallback => (self.width - joint.position.0, joint.position.1),
            _ => joint.position,
        }
    }

    fn bowling(&self, kind: JointKind) -> (f32, f32) {
        self.canonical(kind, self.dominant)
    }

    fn front(&self, kind: JointKind) -> (f32, f32) {
        self.canonical(kind, self.dominant.opposite())
    }

    fn pair(&self, kind: JointKind) -> JointPair {
        JointPair {
            left: self.raw(kind, Side::Left).position,
            right: self.raw(kind, Side::Right).position,
        }
    }

    fn fallbacks(&self) -> Vec<JointName> {
        self.joints
            .iter()
            .filter(|(_, joint)| joint.fallback)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BiomechanicsExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            resolver: JointResolver::with_threshold(config.confidence_threshold),
            dominant_side: config.dominant_side,
        }
    }

    /// Extract measurements, or `None` if the frame has no pose
    /// or no usable pixel dimensions
    pub fn extract(&self, frame: &PoseFrame) -> Option<FrameMeasurements> {
        if !frame.is_detected() {
            log::debug!("No landmarks in frame, skipping");
            return None;
        }
        if frame.width == 0 || frame.height == 0 {
            log::debug!("Frame has zero size {}x{}, skipping", frame.width, frame.height);
            return None;
        }

        use JointKind::*;
        let body = BodyJoints::resolve(&self.resolver, frame, self.dominant_side);

        let shoulder = body.bowling(Shoulder);
        let hip = body.bowling(Hip);

        let arm_angle = angle(shoulder, body.bowling(Elbow), body.bowling(Wrist));

        // Approximation: no finger landmarks, so use deviation from a straight arm
        let wrist_angle = 180.0 - (arm_angle - 180.0).abs();

        let trunk_angle = (shoulder.0 - hip.0)
            .abs()
            .atan2((shoulder.1 - hip.1).abs())
            .to_degrees();

        let front_knee_angle = angle(body.front(Hip), body.front(Knee), body.front(Ankle));
        let back_knee_angle = angle(hip, body.bowling(Knee), body.bowling(Ankle));

        let shoulder_rotation = bearing(body.front(Shoulder), shoulder);
        let hip_alignment = bearing(body.front(Hip), hip);
        let hip_shoulder_separation = (shoulder_rotation - hip_alignment).abs();

        let wrist = body.raw(Wrist, self.dominant_side).position;
        let release_point_height = wrist.1 / frame.height as f32;
        let release_point_horizontal = wrist.0 / frame.width as f32;

        Some(FrameMeasurements {
            arm_angle,
            wrist_angle,
            trunk_angle,
            front_knee_angle,
            back_knee_angle,
            shoulder_rotation,
            hip_alignment,
            hip_shoulder_separation,
            release_point_height,
            release_point_horizontal,
            shoulders: body.pair(Shoulder),
            elbows: body.pair(Elbow),
            wrists: body.pair(Wrist),
            fallback_joints: body.fallbacks(),
        })
    }
}

impl Default for BiomechanicsExtractor {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

/// Extract one frame with the given configuration
pub fn extract_frame(frame: &PoseFrame, config: &AnalysisConfig) -> Option<FrameMeasurements> {
    BiomechanicsExtractor::new(config).extract(frame)
}
