//! Session recording and the JS-facing `BowlingSession`
//!
//! JavaScript pushes one frame of landmarks at a time while the video is
//! decoded, then asks for the analysis. Each frame is measured as it
//! arrives; everything after that is recomputed from the stored
//! measurements on demand. Each session owns its own state.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::landmarks::PoseFrame;
use crate::analysis::{
    compare_sessions, frame_table, summarize, FrameRecord, PerformanceMetrics, PhaseDetector,
    SessionAnalysis, SessionSummary, SessionTimeSeries,
};
use crate::biomechanics::{BiomechanicsExtractor, FrameMeasurements};
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;

/// Accumulates per-frame measurements for one bowling session
pub struct SessionRecorder {
    config: AnalysisConfig,
    extractor: BiomechanicsExtractor,
    measurements: Vec<Option<FrameMeasurements>>,
}

impl SessionRecorder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            extractor: BiomechanicsExtractor::new(&config),
            config,
            measurements: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Measure and store a frame; returns whether a pose was measured
    pub fn push_frame(&mut self, frame: &PoseFrame) -> bool {
        let measurements = self.extractor.extract(frame);
        let measured = measurements.is_some();
        self.measurements.push(measurements);
        measured
    }

    /// Decode a flat JS landmark buffer and push it
    pub fn push_flat(&mut self, data: &[f32], width: u32, height: u32) -> AnalysisResult<bool> {
        let frame = PoseFrame::from_flat(data, width, height)?;
        Ok(self.push_frame(&frame))
    }

    /// Record a frame in which the detector found nobody
    pub fn push_missing(&mut self) {
        self.measurements.push(None);
    }

    pub fn frame_count(&self) -> usize {
        self.measurements.len()
    }

    pub fn valid_frame_count(&self) -> usize {
        self.measurements.iter().flatten().count()
    }

    pub fn measurements(&self) -> &[Option<FrameMeasurements>] {
        &self.measurements
    }

    pub fn analyze(&self) -> SessionAnalysis {
        SessionAnalysis::from_measurements(self.measurements.clone(), &self.config)
    }

    pub fn smoothed_series(&self, window: usize) -> SessionTimeSeries {
        SessionTimeSeries::from_frames(&self.measurements).smoothed(window)
    }

    pub fn export_frames(&self, fps: f32) -> AnalysisResult<Vec<FrameRecord>> {
        frame_table(&self.measurements, fps)
    }

    pub fn summary(&self, fps: f32) -> AnalysisResult<SessionSummary> {
        let phases = PhaseDetector::new(&self.config).detect(&self.measurements);
        summarize(&self.measurements, &phases, fps)
    }

    pub fn reset(&mut self) {
        self.measurements.clear();
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Plain JS objects rather than `Map`s for every map in the output
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

#[wasm_bindgen]
pub struct BowlingSession {
    recorder: SessionRecorder,
}

#[wasm_bindgen]
impl BowlingSession {
    /// Create a session, optionally with a JSON `AnalysisConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<BowlingSession, JsValue> {
        let config = match config_json {
            Some(json) => AnalysisConfig::from_json(&json)?,
            None => AnalysisConfig::default(),
        };
        log::info!("Bowling session created ({:?} arm)", config.dominant_side);
        Ok(Self { recorder: SessionRecorder::new(config) })
    }

    /// Push one frame as a flat Float32Array of `x, y, z, visibility`
    /// per landmark (empty when no pose was detected)
    #[wasm_bindgen(js_name = pushFrame)]
    pub fn push_frame(&mut self, data: &[f32], width: u32, height: u32) -> Result<bool, JsValue> {
        self.recorder.push_flat(data, width, height).map_err(|err| {
            log::warn!("Rejected frame {}: {}", self.recorder.frame_count(), err);
            JsValue::from(err)
        })
    }

    #[wasm_bindgen(js_name = pushMissingFrame)]
    pub fn push_missing_frame(&mut self) {
        self.recorder.push_missing();
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.recorder.frame_count()
    }

    #[wasm_bindgen(js_name = validFrameCount)]
    pub fn valid_frame_count(&self) -> usize {
        self.recorder.valid_frame_count()
    }

    /// Full analysis: measurements, time series, phases and performance
    pub fn analyze(&self) -> Result<JsValue, JsValue> {
        to_js(&self.recorder.analyze())
    }

    #[wasm_bindgen(js_name = smoothedSeries)]
    pub fn smoothed_series(&self, window: usize) -> Result<JsValue, JsValue> {
        to_js(&self.recorder.smoothed_series(window))
    }

    #[wasm_bindgen(js_name = exportFrames)]
    pub fn export_frames(&self, fps: f32) -> Result<JsValue, JsValue> {
        to_js(&self.recorder.export_frames(fps)?)
    }

    pub fn summary(&self, fps: f32) -> Result<JsValue, JsValue> {
        to_js(&self.recorder.summary(fps)?)
    }

    pub fn reset(&mut self) {
        self.recorder.reset();
    }
}

/// Compare the `performance` objects of two `analyze()` results
#[wasm_bindgen(js_name = compareSessions)]
pub fn compare_sessions_js(before: JsValue, after: JsValue) -> Result<JsValue, JsValue> {
    let before: PerformanceMetrics = serde_wasm_bindgen::from_value(before)?;
    let after: PerformanceMetrics = serde_wasm_bindgen::from_value(after)?;
    to_js(&compare_sessions(&before, &after))
}
