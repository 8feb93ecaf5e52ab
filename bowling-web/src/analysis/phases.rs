//! Bowling phase segmentation
//!
//! Heuristic rules that locate five phases of the action along the session.
//! This is a coaching aid, not ground truth: each phase is a frame index or
//! unset, never a guessed default.

use serde::Serialize;

use super::series::position_nearest;
use crate::biomechanics::FrameMeasurements;
use crate::config::AnalysisConfig;

/// Phases of a bowling action, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    #[serde(rename = "Run-up")]
    RunUp,
    Loading,
    #[serde(rename = "Delivery Stride")]
    DeliveryStride,
    Release,
    #[serde(rename = "Follow Through")]
    FollowThrough,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::RunUp,
        Phase::Loading,
        Phase::DeliveryStride,
        Phase::Release,
        Phase::FollowThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::RunUp => "Run-up",
            Phase::Loading => "Loading",
            Phase::DeliveryStride => "Delivery Stride",
            Phase::Release => "Release",
            Phase::FollowThrough => "Follow Through",
        }
    }
}

/// Frame index of each phase, `None` when not identified
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PhaseMap {
    #[serde(rename = "Run-up")]
    pub run_up: Option<usize>,
    #[serde(rename = "Loading")]
    pub loading: Option<usize>,
    #[serde(rename = "Delivery Stride")]
    pub delivery_stride: Option<usize>,
    #[serde(rename = "Release")]
    pub release: Option<usize>,
    #[serde(rename = "Follow Through")]
    pub follow_through: Option<usize>,
}

impl PhaseMap {
    pub fn get(&self, phase: Phase) -> Option<usize> {
        match phase {
            Phase::RunUp => self.run_up,
            Phase::Loading => self.loading,
            Phase::DeliveryStride => self.delivery_stride,
            Phase::Release => self.release,
            Phase::FollowThrough => self.follow_through,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, Option<usize>)> + '_ {
        Phase::ALL.into_iter().map(move |phase| (phase, self.get(phase)))
    }

    pub fn identified_count(&self) -> usize {
        self.iter().filter(|(_, frame)| frame.is_some()).count()
    }
}

/// Rule-based phase detector
pub struct PhaseDetector {
    /// Valid-frame position taken as Run-up
    run_up_position: usize,
    /// Run-up needs more valid frames than this
    run_up_min_frames: usize,
    /// Valid-frame positions from Release to Follow Through
    follow_through_offset: usize,
}

impl PhaseDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            run_up_position: config.run_up_position,
            run_up_min_frames: config.run_up_min_frames,
            follow_through_offset: config.follow_through_offset,
        }
    }

    /// Locate the phases in a session's per-frame results
    ///
    /// Only frames with measurements take part; returned indices refer to
    /// positions in `frames`. Deterministic for identical input.
    pub fn detect(&self, frames: &[Option<FrameMeasurements>]) -> PhaseMap {
        let mut phases = PhaseMap::default();

        // (frame index, arm angle, trunk angle) of measured frames
        let valid: Vec<(usize, f32, f32)> = frames
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (i, m.arm_angle, m.trunk_angle)))
            .collect();

        if valid.is_empty() {
            log::info!("No frames with biomechanics data, phases not identified");
            return phases;
        }

        // RUN-UP: fixed offset, assumes the clip starts near the run-up
        if valid.len() > self.run_up_min_frames {
            phases.run_up = valid.get(self.run_up_position).map(|v| v.0);
        }

        // LOADING: sharpest trunk-angle change
        let trunk_changes: Vec<f32> = valid.windows(2).map(|w| (w[1].2 - w[0].2).abs()).collect();
        if let Some(pos) = first_extreme(&trunk_changes, |a, b| a > b) {
            if pos > 0 {
                phases.loading = Some(valid[pos].0);
            }
        }

        // DELIVERY STRIDE: steepest drop in arm angle
        let arm_changes: Vec<f32> = valid.windows(2).map(|w| w[1].1 - w[0].1).collect();
        if let Some(pos) = first_extreme(&arm_changes, |a, b| a < b) {
            if pos > 0 {
                phases.delivery_stride = Some(valid[pos].0);
            }
        }

        // RELEASE: arm closest to full extension
        let arm_angles: Vec<f32> = valid.iter().map(|v| v.1).collect();
        if let Some(pos) = position_nearest(&arm_angles, 180.0) {
            phases.release = Some(valid[pos].0);

            // FOLLOW THROUGH: a few measured frames later
            phases.follow_through = valid.get(pos + self.follow_through_offset).map(|v| v.0);
        }

        log::debug!("Identified {}/5 phases: {:?}", phases.identified_count(), phases);
        phases
    }
}

impl Default for PhaseDetector {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

/// Position of the first value that beats every later one under `better`
fn first_extreme(values: &[f32], better: impl Fn(f32, f32) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(arm: &[f32], trunk: &[f32]) -> Vec<Option<FrameMeasurements>> {
        arm.iter()
            .zip(trunk)
            .map(|(&a, &t)| {
                Some(FrameMeasurements { arm_angle: a, trunk_angle: t, ..Default::default() })
            })
            .collect()
    }

    fn reference_session() -> Vec<Option<FrameMeasurements>> {
        let arm = [90.0, 120.0, 150.0, 170.0, 180.0, 179.0, 150.0, 120.0, 100.0, 90.0];
        let mut trunk = [45.0; 10];
        trunk[4] = 55.0;
        session(&arm, &trunk)
    }

    #[test]
    fn test_reference_delivery() {
        let phases = PhaseDetector::default().detect(&reference_session());

        assert_eq!(phases.run_up, Some(2));
        // trunk jumps 3→4 and back 4→5; the first of the tied changes wins
        assert_eq!(phases.loading, Some(3));
        // steepest drop is 150→120 starting at frame 6 (-30, vs -29 at 5→6)
        assert_eq!(phases.delivery_stride, Some(6));
        assert_eq!(phases.release, Some(4));
        assert_eq!(phases.follow_through, Some(7));
        assert_eq!(phases.identified_count(), 5);
    }

    #[test]
    fn test_no_frames() {
        let detector = PhaseDetector::default();
        assert_eq!(detector.detect(&[]), PhaseMap::default());
        assert_eq!(detector.detect(&[None, None, None]), PhaseMap::default());
    }

    #[test]
    fn test_indices_refer_to_original_frames() {
        let mut frames = reference_session();
        frames.insert(0, None);
        frames.insert(5, None);
        let phases = PhaseDetector::default().detect(&frames);

        // valid frames now sit at 1,2,3,4,6,7,8,9,10,11
        assert_eq!(phases.run_up, Some(3));
        assert_eq!(phases.release, Some(6));
        assert_eq!(phases.follow_through, Some(9));
    }

    #[test]
    fn test_short_session() {
        let phases = PhaseDetector::default().detect(&session(&[170.0], &[30.0]));
        assert_eq!(phases.release, Some(0));
        assert_eq!(phases.run_up, None);
        assert_eq!(phases.loading, None);
        assert_eq!(phases.delivery_stride, None);
        assert_eq!(phases.follow_through, None);
    }

    #[test]
    fn test_first_transition_never_selected() {
        // single transition
        let phases = PhaseDetector::default().detect(&session(&[180.0, 90.0], &[10.0, 50.0]));
        assert_eq!(phases.loading, None);
        assert_eq!(phases.delivery_stride, None);

        // largest changes at the first transition
        let phases = PhaseDetector::default()
            .detect(&session(&[180.0, 90.0, 85.0, 80.0], &[10.0, 50.0, 51.0, 52.0]));
        assert_eq!(phases.loading, None);
        assert_eq!(phases.delivery_stride, None);

        // all changes tie
        let phases = PhaseDetector::default()
            .detect(&session(&[100.0, 100.0, 100.0], &[20.0, 20.0, 20.0]));
        assert_eq!(phases.loading, None);
        assert_eq!(phases.delivery_stride, None);
    }

    #[test]
    fn test_follow_through_needs_room() {
        let arm = [90.0, 100.0, 120.0, 150.0, 170.0, 175.0, 180.0, 150.0];
        let phases = PhaseDetector::default().detect(&session(&arm, &[40.0; 8]));
        assert_eq!(phases.release, Some(6));
        assert_eq!(phases.follow_through, None);
    }

    #[test]
    fn test_configurable_offsets() {
        let config = AnalysisConfig {
            run_up_position: 0,
            run_up_min_frames: 0,
            follow_through_offset: 1,
            ..Default::default()
        };
        let phases = PhaseDetector::new(&config).detect(&reference_session());
        assert_eq!(phases.run_up, Some(0));
        assert_eq!(phases.follow_through, Some(5));
    }

    #[test]
    fn test_deterministic() {
        let frames = reference_session();
        let detector = PhaseDetector::default();
        assert_eq!(detector.detect(&frames), detector.detect(&frames));
    }

    #[test]
    fn test_phase_map_serializes_with_phase_names() {
        let phases = PhaseMap { release: Some(4), ..Default::default() };
        let json = serde_json::to_value(phases).unwrap();
        assert_eq!(json["Release"], 4);
        assert!(json["Run-up"].is_null());
        assert!(json["Follow Through"].is_null());
    }

    #[test]
    fn test_phase_names() {
        let names: Vec<_> = Phase::ALL.iter().map(Phase::as_str).collect();
        assert_eq!(names, ["Run-up", "Loading", "Delivery Stride", "Release", "Follow Through"]);
    }
}
