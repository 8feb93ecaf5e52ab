//! Biomechanics module - joint geometry and per-frame measurements
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod joints;
mod measurements;
mod extraction;

pub use angles::{angle, bearing, distance, try_vector_angle, vector_angle, DEGENERATE_ANGLE};
pub use joints::{JointKind, JointName, JointResolver, ResolvedJoint, Side, FALLBACK_POSITION};
pub use measurements::{FrameMeasurements, JointPair, Measurement};
pub use extraction::{extract_frame, BiomechanicsExtractor};
