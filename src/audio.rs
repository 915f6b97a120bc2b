//! Sound effects. The controller only fires and forgets; nothing it does
//! depends on whether a sound actually played.

use web_sys::{AudioContext, OscillatorType};

/// Sound cues emitted by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    /// Short pop: bubble popped, session started, new number requested.
    Match,
    /// Cheerful rising arpeggio for the right answer.
    Correct,
    /// Low buzz for a wrong pick.
    Incorrect,
}

pub trait FeedbackService {
    /// Prepares the audio backend. Must be idempotent and cheap to repeat;
    /// browsers only allow it to take effect after a user gesture.
    fn init_audio_context(&mut self);
    fn play(&mut self, sound: Sound);

    fn play_match_sound(&mut self) {
        self.play(Sound::Match);
    }
    fn play_correct_sound(&mut self) {
        self.play(Sound::Correct);
    }
    fn play_incorrect_sound(&mut self) {
        self.play(Sound::Incorrect);
    }
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentFeedback;

impl FeedbackService for SilentFeedback {
    fn init_audio_context(&mut self) {}
    fn play(&mut self, _sound: Sound) {}
}

/// Remembers every call, for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingFeedback {
    pub init_calls: usize,
    pub played: Vec<Sound>,
}

impl FeedbackService for RecordingFeedback {
    fn init_audio_context(&mut self) {
        self.init_calls += 1;
    }
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}

/// Oscillator tones through the Web Audio API.
#[derive(Default)]
pub struct WebAudioFeedback {
    ctx: Option<AudioContext>,
}

impl WebAudioFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ctx.is_some()
    }

    fn tone(
        &self,
        kind: OscillatorType,
        freq: f32,
        offset_s: f64,
        duration_s: f64,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let Some(ctx) = &self.ctx else {
            return Ok(());
        };
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.set_type(kind);
        let t0 = ctx.current_time() + offset_s;
        osc.frequency().set_value_at_time(freq, t0)?;
        gain.gain().set_value_at_time(0.25, t0)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t0 + duration_s)?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;
        osc.start_with_when(t0)?;
        osc.stop_with_when(t0 + duration_s)?;
        Ok(())
    }
}

impl FeedbackService for WebAudioFeedback {
    fn init_audio_context(&mut self) {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(err) => {
                    log::warn!("{}", crate::error::GameError::Audio(format!("{err:?}")));
                    return;
                }
            }
        }
        // Contexts created before a gesture start suspended.
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn play(&mut self, sound: Sound) {
        let result = match sound {
            Sound::Match => self.tone(OscillatorType::Sine, 880.0, 0.0, 0.08),
            Sound::Correct => [523.25, 659.25, 783.99]
                .iter()
                .enumerate()
                .try_for_each(|(i, f)| self.tone(OscillatorType::Triangle, *f, i as f64 * 0.09, 0.18)),
            Sound::Incorrect => self.tone(OscillatorType::Sawtooth, 160.0, 0.0, 0.25),
        };
        if let Err(err) = result {
            log::debug!("sound {sound:?} failed: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_methods_route_to_play() {
        let mut rec = RecordingFeedback::default();
        rec.init_audio_context();
        rec.play_match_sound();
        rec.play_correct_sound();
        rec.play_incorrect_sound();
        assert_eq!(rec.init_calls, 1);
        assert_eq!(rec.played, vec![Sound::Match, Sound::Correct, Sound::Incorrect]);
    }

    #[test]
    fn web_audio_plays_nothing_before_init() {
        let mut web = WebAudioFeedback::new();
        assert!(!web.is_ready());
        web.play(Sound::Correct);
    }
}
