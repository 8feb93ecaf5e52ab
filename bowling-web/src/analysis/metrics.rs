//! Performance metrics, technical score and coaching suggestions
//!
//! Every metric is optional and only computed when its source data exists.
//! The technical score averages whichever sub-scores are computable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::phases::PhaseMap;
use super::series::{max_value, mean, std_dev, SessionTimeSeries};
use crate::biomechanics::{FrameMeasurements, Measurement};

/// Arm angle deviation from 180° that triggers the arm-action suggestion
pub const ARM_ANGLE_TOLERANCE: f32 = 20.0;
/// Acceptable range of max trunk angle (degrees)
pub const TRUNK_ANGLE_RANGE: (f32, f32) = (30.0, 60.0);
/// Below this max hip-shoulder separation, rotation is flagged
pub const MIN_HIP_SHOULDER_SEPARATION: f32 = 30.0;
/// Acceptable range of mean front-knee angle for suggestions
pub const FRONT_KNEE_RANGE: (f32, f32) = (140.0, 170.0);
/// Ideal band of mean front-knee angle for scoring
pub const IDEAL_KNEE_BAND: (f32, f32) = (140.0, 160.0);
/// Arm-angle standard deviation above which consistency is flagged
pub const MAX_ARM_ANGLE_SPREAD: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "Arm Angle at Release")]
    ArmAngleAtRelease,
    #[serde(rename = "Wrist Angle at Release")]
    WristAngleAtRelease,
    /// Percentage of frame height
    #[serde(rename = "Release Height")]
    ReleaseHeight,
    #[serde(rename = "Arm Angle Consistency")]
    ArmAngleConsistency,
    #[serde(rename = "Max Trunk Angle")]
    MaxTrunkAngle,
    #[serde(rename = "Trunk Stability")]
    TrunkStability,
    #[serde(rename = "Max Hip-Shoulder Separation")]
    MaxHipShoulderSeparation,
    #[serde(rename = "Front Knee Angle")]
    FrontKneeAngle,
    /// Mean of the arm, hip-shoulder and trunk sub-scores
    #[serde(rename = "Technical Efficiency")]
    TechnicalEfficiency,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::ArmAngleAtRelease => "Arm Angle at Release",
            Metric::WristAngleAtRelease => "Wrist Angle at Release",
            Metric::ReleaseHeight => "Release Height",
            Metric::ArmAngleConsistency => "Arm Angle Consistency",
            Metric::MaxTrunkAngle => "Max Trunk Angle",
            Metric::TrunkStability => "Trunk Stability",
            Metric::MaxHipShoulderSeparation => "Max Hip-Shoulder Separation",
            Metric::FrontKneeAngle => "Front Knee Angle",
            Metric::TechnicalEfficiency => "Technical Efficiency",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImprovementArea {
    #[serde(rename = "Arm Action")]
    ArmAction,
    #[serde(rename = "Trunk Position")]
    TrunkPosition,
    #[serde(rename = "Hip-Shoulder Rotation")]
    HipShoulderRotation,
    #[serde(rename = "Front Leg")]
    FrontLeg,
    Consistency,
    General,
}

pub type MetricMap = BTreeMap<Metric, f32>;
pub type Suggestions = BTreeMap<ImprovementArea, String>;

/// Metrics, composite 0-100 score and suggestions for one session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub metrics: MetricMap,
    pub score: u8,
    pub suggestions: Suggestions,
}

impl PerformanceMetrics {
    /// Evaluate a session from its series, per-frame results and phases
    pub fn evaluate(
        series: &SessionTimeSeries,
        frames: &[Option<FrameMeasurements>],
        phases: &PhaseMap,
    ) -> Self {
        Self::from_metrics(calculate_metrics(series, frames, phases))
    }

    pub fn from_metrics(metrics: MetricMap) -> Self {
        let score = technical_score(&metrics);
        let suggestions = generate_suggestions(&metrics);
        Self { metrics, score, suggestions }
    }

    pub fn get(&self, metric: Metric) -> Option<f32> {
        self.metrics.get(&metric).copied()
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Derive the summary metrics of a session
///
/// Release metrics come from the Release phase frame; if Release is unset
/// they come from the series entry whose arm angle is nearest 180°.
pub fn calculate_metrics(
    series: &SessionTimeSeries,
    frames: &[Option<FrameMeasurements>],
    phases: &PhaseMap,
) -> MetricMap {
    let mut metrics = MetricMap::new();
    if series.is_empty() || frames.is_empty() {
        return metrics;
    }

    let release = phases.release.and_then(|i| frames.get(i)).and_then(Option::as_ref);
    if let Some(m) = release {
        metrics.insert(Metric::ArmAngleAtRelease, m.arm_angle);
        metrics.insert(Metric::WristAngleAtRelease, m.wrist_angle);
        metrics.insert(Metric::ReleaseHeight, m.release_point_height * 100.0);
    } else if let Some(pos) = series.estimated_release_position() {
        let at = |name| series.get(name).and_then(|values| values.get(pos)).copied();
        if let Some(v) = at(Measurement::ArmAngle) {
            metrics.insert(Metric::ArmAngleAtRelease, v);
        }
        if let Some(v) = at(Measurement::WristAngle) {
            metrics.insert(Metric::WristAngleAtRelease, v);
        }
        if let Some(v) = at(Measurement::ReleasePointHeight) {
            metrics.insert(Metric::ReleaseHeight, v * 100.0);
        }
    }

    let mut insert = |metric, value: Option<f32>| {
        if let Some(v) = value {
            metrics.insert(metric, v);
        }
    };

    if let Some(arm) = series.get(Measurement::ArmAngle) {
        insert(Metric::ArmAngleConsistency, std_dev(arm));
    }
    if let Some(trunk) = series.get(Measurement::TrunkAngle) {
        insert(Metric::MaxTrunkAngle, max_value(trunk));
        insert(Metric::TrunkStability, std_dev(trunk));
    }
    if let Some(separation) = series.get(Measurement::HipShoulderSeparation) {
        insert(Metric::MaxHipShoulderSeparation, max_value(separation));
    }
    if let Some(knee) = series.get(Measurement::FrontKneeAngle) {
        insert(Metric::FrontKneeAngle, mean(knee));
    }

    let efficiency: Vec<f32> = [
        metrics.get(&Metric::ArmAngleAtRelease).map(|&a| arm_angle_score(a)),
        metrics.get(&Metric::MaxHipShoulderSeparation).map(|&s| hip_shoulder_score(s)),
        metrics.get(&Metric::TrunkStability).map(|&t| trunk_stability_score(t)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if let Some(value) = mean(&efficiency) {
        metrics.insert(Metric::TechnicalEfficiency, value);
    }

    metrics
}

// ============================================================================
// SCORING
// ============================================================================

/// 100 at a fully extended arm, -2 per degree of deviation
pub fn arm_angle_score(arm_angle: f32) -> f32 {
    clamp_score(100.0 - ((arm_angle - 180.0).abs() * 2.0).min(100.0))
}

/// 1.5 per degree of separation, capped at 100
pub fn hip_shoulder_score(max_separation: f32) -> f32 {
    clamp_score((max_separation * 1.5).min(100.0))
}

/// -5 per degree of trunk-angle standard deviation
pub fn trunk_stability_score(trunk_stability: f32) -> f32 {
    clamp_score((100.0 - trunk_stability * 5.0).max(0.0))
}

/// 100 inside the ideal band, otherwise -2 per degree away from 150°
pub fn knee_score(front_knee_angle: f32) -> f32 {
    let (low, high) = IDEAL_KNEE_BAND;
    if (low..=high).contains(&front_knee_angle) {
        100.0
    } else {
        clamp_score(100.0 - ((front_knee_angle - 150.0).abs() * 2.0).min(100.0))
    }
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Composite 0-100 score: mean of the computable sub-scores, truncated
///
/// Zero when no sub-score can be computed.
pub fn technical_score(metrics: &MetricMap) -> u8 {
    let components: Vec<f32> = [
        metrics.get(&Metric::ArmAngleAtRelease).map(|&a| arm_angle_score(a)),
        metrics.get(&Metric::MaxHipShoulderSeparation).map(|&s| hip_shoulder_score(s)),
        metrics.get(&Metric::TrunkStability).map(|&t| trunk_stability_score(t)),
        metrics.get(&Metric::FrontKneeAngle).map(|&k| knee_score(k)),
    ]
    .into_iter()
    .flatten()
    .collect();

    match mean(&components) {
        Some(score) => clamp_score(score) as u8,
        None => 0,
    }
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Coaching advice for every metric outside its tolerance band
///
/// Never empty when `metrics` is non-empty: falls back to a general note.
pub fn generate_suggestions(metrics: &MetricMap) -> Suggestions {
    let mut suggestions = Suggestions::new();
    if metrics.is_empty() {
        return suggestions;
    }

    if let Some(&arm) = metrics.get(&Metric::ArmAngleAtRelease) {
        if (arm - 180.0).abs() > ARM_ANGLE_TOLERANCE {
            let text = if arm < 180.0 {
                "Your bowling arm is bending before release. Keep it straighter through \
                 the release for a more efficient action and less injury risk."
            } else {
                "Your bowling arm is rotating past vertical at release. Aim to let the \
                 ball go with the arm closer to vertical."
            };
            suggestions.insert(ImprovementArea::ArmAction, text.to_string());
        }
    }

    if let Some(&trunk) = metrics.get(&Metric::MaxTrunkAngle) {
        let (low, high) = TRUNK_ANGLE_RANGE;
        if trunk < low {
            suggestions.insert(
                ImprovementArea::TrunkPosition,
                "Your trunk stays too upright through delivery. Lean forward more to \
                 drive power from your core into the follow-through."
                    .to_string(),
            );
        } else if trunk > high {
            suggestions.insert(
                ImprovementArea::TrunkPosition,
                "You are leaning too far forward in delivery. Hold a more balanced \
                 trunk position to reduce stress on your lower back."
                    .to_string(),
            );
        }
    }

    if let Some(&separation) = metrics.get(&Metric::MaxHipShoulderSeparation) {
        if separation < MIN_HIP_SHOULDER_SEPARATION {
            suggestions.insert(
                ImprovementArea::HipShoulderRotation,
                "More separation between hips and shoulders in the delivery stride will \
                 add pace. Rotate the shoulders while the hips stay facing the target."
                    .to_string(),
            );
        }
    }

    if let Some(&knee) = metrics.get(&Metric::FrontKneeAngle) {
        let (low, high) = FRONT_KNEE_RANGE;
        if knee < low {
            suggestions.insert(
                ImprovementArea::FrontLeg,
                "Your front knee collapses on delivery. A firmer front leg gives a better \
                 brace and transfers more momentum into the ball."
                    .to_string(),
            );
        } else if knee > high {
            suggestions.insert(
                ImprovementArea::FrontLeg,
                "Your front leg is locked straight on delivery. Allow a little flex in \
                 the knee to absorb landing forces."
                    .to_string(),
            );
        }
    }

    if let Some(&spread) = metrics.get(&Metric::ArmAngleConsistency) {
        if spread > MAX_ARM_ANGLE_SPREAD {
            suggestions.insert(
                ImprovementArea::Consistency,
                "Your arm path varies a lot between frames. Work on repeating the same \
                 action every ball for accuracy and control."
                    .to_string(),
            );
        }
    }

    if suggestions.is_empty() {
        suggestions.insert(
            ImprovementArea::General,
            "Your bowling technique looks good overall. Keep practising for \
             consistency and fine-tuning."
                .to_string(),
        );
    }

    suggestions
}
