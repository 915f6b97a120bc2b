//! Caza-Números core crate.
//!
//! A number-hunting game for children: a target number is announced, twenty
//! colored bubbles labeled 1 to 20 are shown, and the player clicks the one
//! that matches. The gameplay state machine lives in [`controller`] and is
//! plain Rust, so it runs and tests natively; [`web`] wires it to a canvas and
//! the DOM when built for the browser.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod bubble;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod phrases;
pub mod random;
pub mod timers;
mod web;

pub use audio::{FeedbackService, RecordingFeedback, SilentFeedback, Sound, WebAudioFeedback};
pub use bubble::{BUBBLE_COUNT, Bubble, BubbleColor, BubbleId, BubbleState};
pub use config::GameConfig;
pub use controller::{
    ClickOutcome, FeedbackKind, FeedbackMessage, PlayerSession, RoundController, Snapshot,
    TimerRole,
};
pub use error::GameError;
pub use phrases::PhraseBook;
pub use random::{RandomSource, ScriptedRandom};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the existing logger.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Exported entrypoints
// -----------------------------------------------------------------------------

/// Mounts the game with default timings and phrases.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::default()).map_err(JsValue::from)
}

/// Mounts the game with a JSON [`GameConfig`]; absent fields keep defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::mount(config).map_err(JsValue::from)
}

/// Cancels pending timers and returns to the start screen.
#[wasm_bindgen]
pub fn stop_game() {
    web::unmount();
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
