//! Browser-layer and configuration errors.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the browser layer and configuration loading. Gameplay itself
/// has no error states.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no document body")]
    NoBody,
    #[error("canvas 2d context unavailable")]
    NoCanvasContext,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[error("audio unavailable: {0}")]
    Audio(String),
    #[error("invalid {field}: {value}")]
    InvalidDelay { field: &'static str, value: f64 },
    #[cfg(feature = "serde_json")]
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl GameError {
    /// Wraps a thrown JS value, keeping its string form when it has one.
    pub fn dom(err: JsValue) -> Self {
        GameError::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
