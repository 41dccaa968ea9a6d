// JS capability adapters: plain JS objects become `Target` / `Affordance` implementations.
// Capability failures are logged and absorbed; prediction is best-effort.

use js_sys::{Array, Function, Object, Reflect};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::affordance::Affordance;
use crate::error::EngineError;
use crate::registry::Target;
use crate::types::{Highlight, Point};

fn lookup_method(receiver: &JsValue, method: &'static str) -> Result<Function, EngineError> {
    let value = Reflect::get(receiver, &JsValue::from_str(method)).map_err(|e| {
        EngineError::Binding {
            method,
            message: format!("{:?}", e),
        }
    })?;
    value.dyn_into::<Function>().map_err(|_| EngineError::Binding {
        method,
        message: "not a function".to_string(),
    })
}

fn call_method(
    receiver: &JsValue,
    method: &'static str,
    args: &Array,
) -> Result<JsValue, EngineError> {
    lookup_method(receiver, method)?
        .apply(receiver, args)
        .map_err(|e| EngineError::Binding {
            method,
            message: format!("{:?}", e),
        })
}

fn read_coord(object: &JsValue, key: &str) -> f64 {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(f64::NAN)
}

/// A tracked element exposed by the page.
///
/// Expected shape:
/// ```js
/// {
///   getPosition() { return { x, y }; },
///   setHighlight(name, on) { ... },
///   activate() { ... }   // falls back to click()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsTarget {
    element: JsValue,
}

impl JsTarget {
    pub fn new(element: JsValue) -> Self {
        JsTarget { element }
    }
}

impl PartialEq for JsTarget {
    fn eq(&self, other: &Self) -> bool {
        Object::is(&self.element, &other.element)
    }
}

impl Target for JsTarget {
    fn position(&self) -> Point {
        match call_method(&self.element, "getPosition", &Array::new()) {
            Ok(position) => Point::new(read_coord(&position, "x"), read_coord(&position, "y")),
            Err(err) => {
                // Non-finite positions are excluded from prediction.
                warn!(%err, "target position unavailable");
                Point::new(f64::NAN, f64::NAN)
            }
        }
    }

    fn set_highlight(&self, highlight: Highlight, on: bool) {
        let args = Array::of2(&JsValue::from_str(highlight.name()), &JsValue::from_bool(on));
        if let Err(err) = call_method(&self.element, "setHighlight", &args) {
            warn!(%err, highlight = highlight.name(), "highlight toggle failed");
        }
    }

    fn activate(&self) {
        let result = match lookup_method(&self.element, "activate") {
            Ok(_) => call_method(&self.element, "activate", &Array::new()),
            Err(_) => call_method(&self.element, "click", &Array::new()),
        };
        if let Err(err) = result {
            warn!(%err, "target activation failed");
        }
    }
}

/// The page's confirmation element: `{ showAt(x, y), hide() }`.
#[derive(Debug, Clone)]
pub struct JsAffordance {
    element: JsValue,
}

impl JsAffordance {
    pub fn new(element: JsValue) -> Self {
        JsAffordance { element }
    }
}

impl Affordance for JsAffordance {
    fn show_at(&mut self, position: Point) {
        let args = Array::of2(&JsValue::from_f64(position.x), &JsValue::from_f64(position.y));
        if let Err(err) = call_method(&self.element, "showAt", &args) {
            warn!(%err, "affordance placement failed");
        }
    }

    fn hide(&mut self) {
        if let Err(err) = call_method(&self.element, "hide", &Array::new()) {
            warn!(%err, "affordance hide failed");
        }
    }
}
