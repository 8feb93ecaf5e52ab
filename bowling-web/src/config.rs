//! Analysis configuration
//!
//! Passed from JavaScript as JSON. Every field has a default, so `{}` is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::biomechanics::Side;
use crate::error::{AnalysisError, AnalysisResult};

/// Landmarks below this visibility are treated as undetected
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Valid-frame position used as the Run-up frame
pub const DEFAULT_RUN_UP_POSITION: usize = 2;

/// Run-up needs strictly more valid frames than this
pub const DEFAULT_RUN_UP_MIN_FRAMES: usize = 5;

/// Follow Through sits this many valid frames after Release
pub const DEFAULT_FOLLOW_THROUGH_OFFSET: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bowling arm. Front leg is the opposite side.
    pub dominant_side: Side,
    pub confidence_threshold: f32,
    pub run_up_position: usize,
    pub run_up_min_frames: usize,
    pub follow_through_offset: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dominant_side: Side::Right,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            run_up_position: DEFAULT_RUN_UP_POSITION,
            run_up_min_frames: DEFAULT_RUN_UP_MIN_FRAMES,
            follow_through_offset: DEFAULT_FOLLOW_THROUGH_OFFSET,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.confidence_threshold)
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.run_up_position > self.run_up_min_frames {
            return Err(AnalysisError::InvalidConfig(format!(
                "run_up_position {} is unreachable with run_up_min_frames {}",
                self.run_up_position, self.run_up_min_frames
            )));
        }
        if self.follow_through_offset == 0 {
            return Err(AnalysisError::InvalidConfig(
                "follow_through_offset must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
