//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod recorder;

pub use landmarks::{
    Landmark,
    PoseFrame,
    // Constants
    LANDMARK_COUNT, LANDMARK_STRIDE,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};

pub use recorder::{
    // WASM entry points
    BowlingSession,
    compare_sessions_js,
    // Internal API
    SessionRecorder,
};
