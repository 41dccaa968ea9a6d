// intent_core: pointer-intent prediction for early activation.
// The host owns the event loop and timers; it pushes moves and advances time.
// Everything that decides *what* the user is reaching for lives here.

mod affordance;
mod error;
mod js;
mod predictor;
mod registry;
mod sampler;
mod throttle;
mod tracker;
mod types;

use wasm_bindgen::prelude::*;

pub use affordance::{placement, Affordance, AffordanceController, AffordanceState};
pub use error::{EngineError, GeometryError};
pub use js::{JsAffordance, JsTarget};
pub use predictor::{motion_endpoints, predict, Candidate, TriangleMetrics};
pub use registry::{Target, TargetPosition, TargetRegistry};
pub use sampler::{
    MotionObserver, MotionSampler, SampleWindow, SamplerPhase, StopResponse, WINDOW_CAPACITY,
    WINDOW_RETAIN,
};
pub use throttle::InputThrottle;
pub use tracker::{IntentTracker, TrackerStatus};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Parse and validate an engine config. An empty string means all defaults.
pub fn parse_config(config_json: &str) -> Result<EngineConfig, EngineError> {
    if config_json.trim().is_empty() {
        return Ok(EngineConfig::default());
    }
    let config: EngineConfig = serde_json::from_str(config_json)?;
    config.validate()?;
    Ok(config)
}

/// Engine interface exposed to JavaScript.
///
/// # Example JSON Config
/// ```json
/// {
///   "sampler": { "sample_interval_us": 10000, "report_interval_us": 100000 },
///   "predictor": { "max_alignment_deg": 5.0, "anchor": "Window" },
///   "affordance": { "pop_distance": 50.0 }
/// }
/// ```
#[wasm_bindgen]
pub struct IntentEngine {
    tracker: IntentTracker<JsTarget, JsAffordance>,
}

#[wasm_bindgen]
impl IntentEngine {
    /// Create an engine from JSON config and the page's affordance element.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, affordance: JsValue) -> Result<IntentEngine, JsValue> {
        let config = parse_config(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(IntentEngine {
            tracker: IntentTracker::new(config, JsAffordance::new(affordance)),
        })
    }

    pub fn add_target(&mut self, target: JsValue) {
        self.tracker.add_target(JsTarget::new(target));
    }

    pub fn remove_target(&mut self, target: JsValue) {
        self.tracker.remove_target(&JsTarget::new(target));
    }

    /// Re-read target positions after scroll or resize.
    pub fn refresh_positions(&mut self) {
        self.tracker.refresh_positions();
    }

    /// Raw pointer move at host time `timestamp_ms` (`performance.now()`).
    pub fn pointer_move(&mut self, x: f64, y: f64, timestamp_ms: f64) {
        self.tracker
            .pointer_moved(Point::new(x, y), Timestamp::from_millis_f64(timestamp_ms));
    }

    /// Advance host time; call from a timer or animation frame.
    pub fn advance(&mut self, timestamp_ms: f64) {
        self.tracker.advance(Timestamp::from_millis_f64(timestamp_ms));
    }

    pub fn affordance_hover(&mut self, on: bool) {
        self.tracker.affordance_hovered(on);
    }

    /// Returns `true` when a target was activated.
    pub fn affordance_click(&mut self) -> bool {
        self.tracker.affordance_activated().is_some()
    }

    /// Returns `true` when a pending offer was withdrawn.
    pub fn dismiss(&mut self) -> bool {
        self.tracker.dismiss().is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.tracker.sampler().is_attached()
    }

    pub fn attach(&mut self) {
        self.tracker.sampler_mut().attach();
    }

    pub fn detach(&mut self) {
        self.tracker.sampler_mut().detach();
    }

    pub fn reset(&mut self) {
        self.tracker.sampler_mut().reset();
    }

    /// Current tracker status as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.tracker.status())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
