//! Whole-session analysis pipeline
//!
//! raw joints → per-frame measurements → time series → phases → metrics.
//! Pure: the same frames and config always give the same analysis.

use serde::Serialize;

use super::metrics::PerformanceMetrics;
use super::phases::{PhaseDetector, PhaseMap};
use super::series::SessionTimeSeries;
use crate::biomechanics::{BiomechanicsExtractor, FrameMeasurements};
use crate::bridge::PoseFrame;
use crate::config::AnalysisConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionAnalysis {
    /// One entry per input frame, `None` where no pose was found
    pub measurements: Vec<Option<FrameMeasurements>>,
    pub time_series: SessionTimeSeries,
    pub phases: PhaseMap,
    pub performance: PerformanceMetrics,
}

impl SessionAnalysis {
    /// Run the later stages on already extracted measurements
    pub fn from_measurements(measurements: Vec<Option<FrameMeasurements>>, config: &AnalysisConfig) -> Self {
        let time_series = SessionTimeSeries::from_frames(&measurements);
        let phases = PhaseDetector::new(config).detect(&measurements);
        let performance = PerformanceMetrics::evaluate(&time_series, &measurements, &phases);

        log::info!(
            "Analyzed {} frames ({} with pose): score {}, {}/5 phases",
            measurements.len(),
            time_series.frame_count(),
            performance.score,
            phases.identified_count(),
        );

        Self { measurements, time_series, phases, performance }
    }

    pub fn valid_frame_count(&self) -> usize {
        self.measurements.iter().flatten().count()
    }
}

/// Analyze a full session of pose frames, in frame order
pub fn analyze_session(frames: &[PoseFrame], config: &AnalysisConfig) -> SessionAnalysis {
    let extractor = BiomechanicsExtractor::new(config);
    let measurements = frames.iter().map(|frame| extractor.extract(frame)).collect();
    SessionAnalysis::from_measurements(measurements, config)
}
