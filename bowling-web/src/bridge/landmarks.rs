//! Landmark input from the pose detector
//!
//! JavaScript runs MediaPipe Pose and hands each frame to Rust as a flat
//! Float32Array of `x, y, z, visibility` quadruples (normalized coordinates).
//! An empty array means no pose was detected in that frame.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

/// Floats per landmark in the flat JS buffer: x, y, z, visibility
pub const LANDMARK_STRIDE: usize = 4;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ============================================================================
// LANDMARK DATA STRUCTURES
// ============================================================================

/// A single pose landmark (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized
    pub y: f32,          // 0-1 normalized
    pub z: f32,          // Relative depth (unused by the 2-D pipeline)
    pub visibility: f32, // 0-1 detection confidence
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, z: 0.0, visibility }
    }
}

/// One video frame as seen by the analysis pipeline
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Empty when the detector found no pose
    pub landmarks: Vec<Landmark>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl PoseFrame {
    pub fn new(landmarks: Vec<Landmark>, width: u32, height: u32) -> Self {
        Self { landmarks, width, height }
    }

    /// A frame in which no pose was detected
    pub fn missing(width: u32, height: u32) -> Self {
        Self::new(Vec::new(), width, height)
    }

    /// Decode the flat `x, y, z, visibility` buffer sent from JavaScript
    ///
    /// Buffers shorter than 33 landmarks are accepted; joints past the end
    /// are resolved as undetected during extraction.
    pub fn from_flat(data: &[f32], width: u32, height: u32) -> AnalysisResult<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidFrameSize { width, height });
        }
        if data.len() % LANDMARK_STRIDE != 0 {
            return Err(AnalysisError::InvalidLandmarkData { len: data.len() });
        }

        let landmarks = data
            .chunks_exact(LANDMARK_STRIDE)
            .map(|c| Landmark { x: c[0], y: c[1], z: c[2], visibility: c[3] })
            .collect();

        Ok(Self::new(landmarks, width, height))
    }

    pub fn is_detected(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Landmark at a MediaPipe index, if the detector supplied one
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}
