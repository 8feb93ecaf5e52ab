//! Bowling Web - cricket bowling biomechanics from pose landmarks
//!
//! JavaScript runs MediaPipe Pose on each video frame and pushes the
//! landmarks into a `BowlingSession`; this crate turns them into joint
//! angles, phases of the action, metrics and a technical score.
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod analysis;
pub mod biomechanics;
pub mod bridge;
pub mod config;
pub mod error;

use wasm_bindgen::prelude::*;

pub use analysis::{analyze_session, PerformanceMetrics, PhaseMap, SessionAnalysis, SessionTimeSeries};
pub use biomechanics::{FrameMeasurements, Side};
pub use bridge::{BowlingSession, Landmark, PoseFrame, SessionRecorder};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console
///
/// Level: "trace", "debug", "info", "warn" or "error" (default "info")
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };
    wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("Bowling analysis ready (log level {})", log_level);
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
