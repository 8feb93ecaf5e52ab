//! End-to-end tests: synthetic landmark frames through the full pipeline.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use bowling_web::analysis::{
    generate_suggestions, technical_score, Metric, MetricMap, PhaseDetector,
};
use bowling_web::biomechanics::{JointName, Measurement};
use bowling_web::bridge::*;
use bowling_web::{analyze_session, AnalysisConfig, FrameMeasurements, SessionTimeSeries, Side};

const SIZE: u32 = 1000;

/// Build a right-arm pose (pixel coordinates in a 1000x1000 frame) with the
/// given bowling-arm and trunk angles in degrees.
fn pose(arm_angle: f32, trunk_angle: f32) -> PoseFrame {
    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    let mut set = |index: usize, (x, y): (f32, f32)| {
        landmarks[index] = Landmark::new(x / SIZE as f32, y / SIZE as f32, 0.95);
    };

    let shoulder = (500.0, 400.0);
    let elbow = (500.0, 500.0);
    // shoulder sits straight above the elbow, so the wrist bearing is arm - 90°
    let phi = (arm_angle - 90.0).to_radians();
    let wrist = (elbow.0 + 100.0 * phi.cos(), elbow.1 + 100.0 * phi.sin());

    let t = trunk_angle.to_radians();
    let hip = (shoulder.0 - 300.0 * t.sin(), shoulder.1 + 300.0 * t.cos());

    set(RIGHT_SHOULDER, shoulder);
    set(RIGHT_ELBOW, elbow);
    set(RIGHT_WRIST, wrist);
    set(RIGHT_HIP, hip);
    set(RIGHT_KNEE, (hip.0 + 20.0, hip.1 + 150.0));
    set(RIGHT_ANKLE, (hip.0 + 20.0, hip.1 + 300.0));
    set(LEFT_SHOULDER, (420.0, 380.0));
    set(LEFT_ELBOW, (380.0, 450.0));
    set(LEFT_WRIST, (360.0, 520.0));
    set(LEFT_HIP, (hip.0 - 60.0, hip.1 - 10.0));
    set(LEFT_KNEE, (hip.0 - 120.0, hip.1 + 120.0));
    set(LEFT_ANKLE, (hip.0 - 130.0, hip.1 + 280.0));

    PoseFrame::new(landmarks, SIZE, SIZE)
}

fn reference_frames() -> Vec<PoseFrame> {
    let arm = [90.0, 120.0, 150.0, 170.0, 180.0, 179.0, 150.0, 120.0, 100.0, 90.0];
    arm.iter()
        .enumerate()
        .map(|(i, &a)| pose(a, if i == 4 { 55.0 } else { 45.0 }))
        .collect()
}

#[test]
fn test_synthetic_pose_measures_requested_angles() {
    let analysis = analyze_session(&[pose(150.0, 45.0)], &AnalysisConfig::default());
    let m = analysis.measurements[0].as_ref().unwrap();
    assert_abs_diff_eq!(m.arm_angle, 150.0, epsilon = 0.01);
    assert_abs_diff_eq!(m.wrist_angle, 150.0, epsilon = 0.01);
    assert_abs_diff_eq!(m.trunk_angle, 45.0, epsilon = 0.01);
    assert!(m.is_fully_detected());
}

#[test]
fn test_reference_delivery_end_to_end() {
    let analysis = analyze_session(&reference_frames(), &AnalysisConfig::default());
    let phases = analysis.phases;

    assert_eq!(phases.release, Some(4));
    assert_eq!(phases.run_up, Some(2));
    assert_eq!(phases.loading, Some(3));
    assert_eq!(phases.delivery_stride, Some(6));
    assert_eq!(phases.follow_through, Some(7));

    // non-strict ordering sanity
    assert!(phases.run_up < phases.release && phases.release < phases.follow_through);

    let performance = &analysis.performance;
    assert_abs_diff_eq!(performance.get(Metric::ArmAngleAtRelease).unwrap(), 180.0, epsilon = 0.01);
    assert_abs_diff_eq!(performance.get(Metric::MaxTrunkAngle).unwrap(), 55.0, epsilon = 0.01);
    assert!(performance.score <= 100);
    assert!(!performance.suggestions.is_empty());

    for (_, values) in analysis.time_series.iter() {
        assert_eq!(values.len(), 10);
    }
}

#[test]
fn test_gaps_keep_original_frame_indices() {
    let mut frames = reference_frames();
    frames.insert(2, PoseFrame::missing(SIZE, SIZE));
    let analysis = analyze_session(&frames, &AnalysisConfig::default());

    assert_eq!(analysis.measurements.len(), 11);
    assert_eq!(analysis.valid_frame_count(), 10);
    assert_eq!(analysis.phases.release, Some(5));
    assert_eq!(analysis.time_series.get(Measurement::ArmAngle).unwrap().len(), 10);
}

#[test]
fn test_zero_valid_frames() {
    let frames = vec![PoseFrame::missing(SIZE, SIZE); 5];
    let analysis = analyze_session(&frames, &AnalysisConfig::default());

    assert!(analysis.time_series.is_empty());
    assert_eq!(analysis.phases.identified_count(), 0);
    assert!(analysis.performance.metrics.is_empty());
    assert_eq!(analysis.performance.score, 0);
    assert!(analysis.performance.suggestions.is_empty());
}

#[test]
fn test_low_confidence_joint_degrades_silently() {
    let mut frame = pose(170.0, 45.0);
    frame.landmarks[RIGHT_ELBOW].visibility = 0.2;
    let analysis = analyze_session(&[frame], &AnalysisConfig::default());

    // frame still counts, but the arm angle is computed from the (0,0) sentinel
    let m = analysis.measurements[0].as_ref().unwrap();
    assert_eq!(m.fallback_joints, vec![JointName::RightElbow]);
    assert!((m.arm_angle - 170.0).abs() > 1.0);
    assert_eq!(analysis.time_series.frame_count(), 1);
}

#[test]
fn test_left_arm_config_reads_left_side() {
    let frame = pose(160.0, 40.0);
    let config = AnalysisConfig { dominant_side: Side::Left, ..Default::default() };
    let right = analyze_session(&[frame.clone()], &AnalysisConfig::default());
    let left = analyze_session(&[frame], &config);

    let r = right.measurements[0].as_ref().unwrap();
    let l = left.measurements[0].as_ref().unwrap();
    assert!((r.arm_angle - l.arm_angle).abs() > 1.0);
    assert_eq!(r.release_point_horizontal, r.wrists.right.0 / SIZE as f32);
    assert_eq!(l.release_point_horizontal, l.wrists.left.0 / SIZE as f32);
}

#[test]
fn test_recorder_matches_batch_analysis() {
    let frames = reference_frames();
    let mut recorder = SessionRecorder::default();
    for frame in &frames {
        let data: Vec<f32> = frame
            .landmarks
            .iter()
            .flat_map(|l| [l.x, l.y, l.z, l.visibility])
            .collect();
        assert!(recorder.push_flat(&data, SIZE, SIZE).unwrap());
    }
    assert_eq!(recorder.analyze(), analyze_session(&frames, recorder.config()));
}

#[test]
fn test_phase_detection_is_deterministic() {
    let analysis = analyze_session(&reference_frames(), &AnalysisConfig::default());
    let detector = PhaseDetector::default();
    assert_eq!(detector.detect(&analysis.measurements), analysis.phases);
    assert_eq!(detector.detect(&analysis.measurements), detector.detect(&analysis.measurements));
}

fn metric() -> impl Strategy<Value = Metric> {
    prop_oneof![
        Just(Metric::ArmAngleAtRelease),
        Just(Metric::WristAngleAtRelease),
        Just(Metric::ReleaseHeight),
        Just(Metric::ArmAngleConsistency),
        Just(Metric::MaxTrunkAngle),
        Just(Metric::TrunkStability),
        Just(Metric::MaxHipShoulderSeparation),
        Just(Metric::FrontKneeAngle),
    ]
}

proptest! {
    #[test]
    fn prop_score_in_range(entries in prop::collection::vec((metric(), -500.0f32..500.0), 0..8)) {
        let metrics: MetricMap = entries.into_iter().collect();
        prop_assert!(technical_score(&metrics) <= 100);
    }

    #[test]
    fn prop_suggestions_present_with_metrics(
        entries in prop::collection::vec((metric(), -500.0f32..500.0), 1..8),
    ) {
        let metrics: MetricMap = entries.into_iter().collect();
        prop_assert!(!generate_suggestions(&metrics).is_empty());
    }

    #[test]
    fn prop_series_length_equals_measured_frames(
        present in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let frames: Vec<Option<FrameMeasurements>> = present
            .iter()
            .map(|&p| p.then(FrameMeasurements::default))
            .collect();
        let measured = present.iter().filter(|&&p| p).count();
        let series = SessionTimeSeries::from_frames(&frames);
        for m in Measurement::ALL {
            let len = series.get(m).map_or(0, <[f32]>::len);
            prop_assert_eq!(len, measured);
            prop_assert!(len <= frames.len());
        }
    }

    #[test]
    fn prop_phase_order_when_all_identified(arms in prop::collection::vec(0.0f32..360.0, 6..30)) {
        let frames: Vec<Option<FrameMeasurements>> = arms
            .iter()
            .enumerate()
            .map(|(i, &a)| Some(FrameMeasurements {
                arm_angle: a,
                trunk_angle: (i % 3) as f32 * 10.0,
                ..Default::default()
            }))
            .collect();
        let phases = PhaseDetector::default().detect(&frames);
        if let (Some(release), Some(follow)) = (phases.release, phases.follow_through) {
            prop_assert!(release < follow);
        }
    }
}
