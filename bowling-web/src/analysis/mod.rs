//! Analysis module - session-level aggregation, phases and scoring
//!
//! Re-exports only. All logic in submodules.

mod series;
mod phases;
mod metrics;
mod compare;
mod export;
mod session;

pub use series::SessionTimeSeries;
pub use phases::{Phase, PhaseDetector, PhaseMap};
pub use metrics::{
    arm_angle_score, calculate_metrics, generate_suggestions, hip_shoulder_score, knee_score,
    technical_score, trunk_stability_score, ImprovementArea, Metric, MetricMap,
    PerformanceMetrics, Suggestions,
};
pub use compare::{compare_sessions, MetricChange, SessionComparison};
pub use export::{frame_table, summarize, FrameRecord, SessionSummary};
pub use session::{analyze_session, SessionAnalysis};
