//! Per-frame export table and session summary

use std::collections::BTreeMap;

use serde::Serialize;

use super::phases::PhaseMap;
use crate::biomechanics::{FrameMeasurements, Measurement};
use crate::error::{AnalysisError, AnalysisResult};

/// One measured frame, flattened for tabular export
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    /// Seconds from the first frame
    pub timestamp: f32,
    #[serde(flatten)]
    pub values: BTreeMap<Measurement, f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frame_count: usize,
    pub valid_frame_count: usize,
    pub fps: f32,
    /// Release phase frame converted to seconds
    pub release_time_secs: Option<f32>,
}

fn check_fps(fps: f32) -> AnalysisResult<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidFrameRate(fps))
    }
}

/// Flatten measured frames into records; undetected frames are omitted
pub fn frame_table(frames: &[Option<FrameMeasurements>], fps: f32) -> AnalysisResult<Vec<FrameRecord>> {
    check_fps(fps)?;
    Ok(frames
        .iter()
        .enumerate()
        .filter_map(|(frame, m)| {
            let m = m.as_ref()?;
            Some(FrameRecord {
                frame,
                timestamp: frame as f32 / fps,
                values: m.scalars().collect(),
            })
        })
        .collect())
}

pub fn summarize(
    frames: &[Option<FrameMeasurements>],
    phases: &PhaseMap,
    fps: f32,
) -> AnalysisResult<SessionSummary> {
    check_fps(fps)?;
    Ok(SessionSummary {
        frame_count: frames.len(),
        valid_frame_count: frames.iter().flatten().count(),
        fps,
        release_time_secs: phases.release.map(|frame| frame as f32 / fps),
    })
}
