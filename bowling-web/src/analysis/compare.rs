//! Session-to-session comparison

use serde::Serialize;

use super::metrics::{Metric, PerformanceMetrics};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricChange {
    pub metric: Metric,
    pub before: f32,
    pub after: f32,
    /// `after - before`
    pub change: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionComparison {
    /// Metrics present in both sessions, in metric order
    pub changes: Vec<MetricChange>,
    pub score_change: i16,
}

/// Compare two evaluated sessions
pub fn compare_sessions(before: &PerformanceMetrics, after: &PerformanceMetrics) -> SessionComparison {
    let changes = before
        .metrics
        .iter()
        .filter_map(|(metric, &b)| {
            let a = after.get(*metric)?;
            Some(MetricChange { metric: *metric, before: b, after: a, change: a - b })
        })
        .collect();

    SessionComparison {
        changes,
        score_change: i16::from(after.score) - i16::from(before.score),
    }
}
