//! Scripted pointer sessions.
//!
//! A script is a JSON array of events, each tagged by `type`:
//!
//! ```json
//! [
//!   { "type": "origin", "x": 0, "y": 0 },
//!   { "type": "down", "x": 50, "y": 50, "shift": true },
//!   { "type": "move", "x": 90, "y": 70 },
//!   { "type": "up", "x": 90, "y": 70 },
//!   { "type": "wheel", "x": 50, "y": 50, "dy": -1 },
//!   { "type": "zoom", "value": 1.5 }
//! ]
//! ```
//!
//! Coordinates are viewport pixels. Modifier flags default to `false`.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use grid::input::Modifiers;
use serde::{Deserialize, Serialize};

/// Error returned when a session script cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event {index}: zoom must be positive and finite, got {value}")]
    InvalidZoom { index: usize, value: f64 },
}

/// Modifier keys held during a pointer event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl From<Keys> for Modifiers {
    fn from(keys: Keys) -> Self {
        Self { shift: keys.shift, ctrl: keys.ctrl, alt: keys.alt, meta: keys.meta }
    }
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScriptEvent {
    /// Primary button pressed.
    Down {
        x: f64,
        y: f64,
        #[serde(flatten)]
        keys: Keys,
    },
    /// Pointer moved.
    Move {
        x: f64,
        y: f64,
        #[serde(flatten)]
        keys: Keys,
    },
    /// Primary button released.
    Up {
        x: f64,
        y: f64,
        #[serde(flatten)]
        keys: Keys,
    },
    /// Vertical wheel notch; negative `dy` is wheel-up.
    Wheel { x: f64, y: f64, dy: f64 },
    /// Canvas element moved within the viewport.
    Origin { x: f64, y: f64 },
    /// Orchestrator changed the render scale.
    Zoom { value: f64 },
}

/// Parse and validate a script.
///
/// # Errors
///
/// Returns [`ScriptError::Json`] for malformed JSON or unknown event types and
/// [`ScriptError::InvalidZoom`] for a zoom the engine could not use.
pub fn parse(text: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let events: Vec<ScriptEvent> = serde_json::from_str(text)?;
    for (index, event) in events.iter().enumerate() {
        if let ScriptEvent::Zoom { value } = *event {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScriptError::InvalidZoom { index, value });
            }
        }
    }
    Ok(events)
}
