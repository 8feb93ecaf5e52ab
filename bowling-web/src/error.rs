//! Error types for the bowling analysis crate.
//!
//! The analysis core never fails: bad joints and empty sessions degrade to
//! absent measurements. Errors only come from decoding input at the JS
//! boundary and from configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Convenient `Result` alias for the fallible entry points.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The flat landmark buffer is not made of whole `x, y, z, visibility` groups.
    #[error("Invalid landmark data length: {len} (expected a multiple of 4)")]
    InvalidLandmarkData { len: usize },

    /// A frame must have non-zero pixel dimensions.
    #[error("Invalid frame size: {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },

    /// Frame rate must be finite and positive.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AnalysisError> for JsValue {
    fn from(err: AnalysisError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
