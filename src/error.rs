// Typed errors with thiserror. Surface meaningful messages to JS.
// Geometry errors never reach the caller; the predictor turns them into exclusions.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JS capability `{method}` failed: {message}")]
    Binding { method: &'static str, message: String },
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

/// Reasons a target cannot be measured against the current motion vector.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("target coincides with a motion endpoint")]
    Degenerate,

    #[error("non-finite coordinate in triangle")]
    NonFinite,
}
