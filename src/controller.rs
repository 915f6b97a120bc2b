//! Round controller: owns the bubbles, target, score and feedback, reacts to
//! clicks and skips, and runs the deferred resets on a logical clock.
//!
//! All mutation goes through `&mut self`, so events and timer callbacks are
//! strictly serialized. Deferred effects are keyed timers (see [`TimerRole`]);
//! a new round cancels every timer that belonged to the previous one, and the
//! error reset re-checks the round and the bubble before touching anything.

use std::collections::HashMap;

use rand::rngs::StdRng;

use crate::audio::{FeedbackService, SilentFeedback};
use crate::bubble::{Bubble, BubbleId, BubbleState, generate_bubbles, pick_target};
use crate::config::GameConfig;
use crate::random::RandomSource;
use crate::timers::TimerQueue;

/// Deferred effect keys. One pending timer per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerRole {
    FeedbackExpiry,
    ErrorReset { bubble: BubbleId, round: u64 },
    RoundRegeneration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedbackMessage {
    pub text: String,
    pub kind: FeedbackKind,
    pub expires_at_ms: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerSession {
    pub name: String,
    pub active: bool,
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Match,
    Mismatch,
    /// No session, unknown bubble, or a bubble that already popped.
    Ignored,
}

/// Read-only view handed to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub round: u64,
    pub bubbles: Vec<Bubble>,
    /// One entry per bubble, in the same order as `bubbles`.
    pub states: Vec<BubbleState>,
    pub target_value: u32,
    pub score: u32,
    pub feedback: Option<FeedbackMessage>,
    pub player_name: String,
    pub active: bool,
    pub regeneration_pending: bool,
}

pub struct RoundController<R = StdRng, F = SilentFeedback> {
    config: GameConfig,
    rng: R,
    audio: F,
    session: PlayerSession,
    round: u64,
    bubbles: Vec<Bubble>,
    states: HashMap<BubbleId, BubbleState>,
    target_value: u32,
    score: u32,
    feedback: Option<FeedbackMessage>,
    timers: TimerQueue<TimerRole>,
    now_ms: f64,
}

impl<R: RandomSource, F: FeedbackService> RoundController<R, F> {
    /// Builds an inactive controller with a first round already laid out, so
    /// the target invariant holds before any session starts.
    pub fn new(config: GameConfig, rng: R, audio: F) -> Self {
        let mut controller = Self {
            config,
            rng,
            audio,
            session: PlayerSession::default(),
            round: 0,
            bubbles: Vec::new(),
            states: HashMap::new(),
            target_value: 0,
            score: 0,
            feedback: None,
            timers: TimerQueue::new(),
            now_ms: 0.0,
        };
        controller.generate_round();
        controller
    }

    /// Starts (or restarts) a session for `name` at score 0 with a new round.
    pub fn start_session(&mut self, name: &str) {
        self.timers.clear();
        self.feedback = None;
        self.score = 0;
        self.session = PlayerSession {
            name: name.to_string(),
            active: true,
        };
        self.audio.init_audio_context();
        self.audio.play_match_sound();
        self.generate_round();
        log::info!("session started for {:?}", self.session.name);
    }

    /// Replaces the bubbles with a freshly shuffled set, picks a new target and
    /// clears every visual state. Timers tied to the old round are cancelled.
    pub fn generate_round(&mut self) {
        self.timers.cancel_where(|role| {
            matches!(
                role,
                TimerRole::ErrorReset { .. } | TimerRole::RoundRegeneration
            )
        });
        self.round += 1;
        self.bubbles = generate_bubbles(&mut self.rng);
        self.states.clear();
        // generate_bubbles never returns an empty round
        self.target_value = pick_target(&self.bubbles, &mut self.rng).unwrap_or(1);
        log::debug!("round {} target {}", self.round, self.target_value);
    }

    pub fn handle_bubble_click(&mut self, id: BubbleId, value: u32) -> ClickOutcome {
        if !self.session.active || !self.bubbles.iter().any(|b| b.id == id) {
            return ClickOutcome::Ignored;
        }
        if self.visual_state(id) == BubbleState::Popped {
            return ClickOutcome::Ignored;
        }
        self.audio.init_audio_context();

        if value == self.target_value {
            self.audio.play_correct_sound();
            self.audio.play_match_sound();
            self.show_feedback(FeedbackKind::Success);
            self.score += 1;
            self.states.insert(id, BubbleState::Popped);
            let at = self.now_ms + self.config.regeneration_delay_ms;
            self.timers.schedule(TimerRole::RoundRegeneration, at);
            ClickOutcome::Match
        } else {
            self.audio.play_incorrect_sound();
            self.show_feedback(FeedbackKind::Error);
            self.states.insert(id, BubbleState::Error);
            let at = self.now_ms + self.config.error_reset_delay_ms;
            self.timers.schedule(
                TimerRole::ErrorReset {
                    bubble: id,
                    round: self.round,
                },
                at,
            );
            ClickOutcome::Mismatch
        }
    }

    /// "New number" button: new round right away, feedback wiped.
    pub fn skip_to_new_number(&mut self) {
        if !self.session.active {
            return;
        }
        self.audio.init_audio_context();
        self.audio.play_match_sound();
        self.generate_round();
        self.clear_feedback();
    }

    /// Moves the clock to `now_ms` (never backwards) and runs every timer that
    /// came due, earliest first.
    pub fn advance_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        while let Some(role) = self.timers.pop_due(self.now_ms) {
            self.fire(role);
        }
    }

    /// Stops the session and drops every pending timer.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.feedback = None;
        self.session.active = false;
        log::info!("session for {:?} torn down", self.session.name);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            bubbles: self.bubbles.clone(),
            states: self.bubbles.iter().map(|b| self.visual_state(b.id)).collect(),
            target_value: self.target_value,
            score: self.score,
            feedback: self.feedback.clone(),
            player_name: self.session.name.clone(),
            active: self.session.active,
            regeneration_pending: self.timers.is_pending(&TimerRole::RoundRegeneration),
        }
    }

    pub fn visual_state(&self, id: BubbleId) -> BubbleState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn target_value(&self) -> u32 {
        self.target_value
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn feedback(&self) -> Option<&FeedbackMessage> {
        self.feedback.as_ref()
    }

    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn audio(&self) -> &F {
        &self.audio
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn timer_deadline(&self, role: &TimerRole) -> Option<f64> {
        self.timers.deadline(role)
    }

    fn show_feedback(&mut self, kind: FeedbackKind) {
        let name = &self.session.name;
        let text = match kind {
            FeedbackKind::Success => self.config.phrases.success_for(name, &mut self.rng),
            FeedbackKind::Error => self.config.phrases.encouragement_for(name, &mut self.rng),
        };
        let expires_at_ms = self.now_ms + self.config.feedback_duration_ms;
        self.feedback = Some(FeedbackMessage {
            text,
            kind,
            expires_at_ms,
        });
        self.timers.schedule(TimerRole::FeedbackExpiry, expires_at_ms);
    }

    fn clear_feedback(&mut self) {
        self.feedback = None;
        self.timers.cancel(&TimerRole::FeedbackExpiry);
    }

    fn fire(&mut self, role: TimerRole) {
        match role {
            TimerRole::FeedbackExpiry => self.feedback = None,
            TimerRole::ErrorReset { bubble, round } => {
                // stale: the round moved on or the bubble is no longer wiggling
                if round == self.round && self.visual_state(bubble) == BubbleState::Error {
                    self.states.insert(bubble, BubbleState::Idle);
                }
            }
            TimerRole::RoundRegeneration => {
                if self.session.active {
                    self.generate_round();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingFeedback, Sound};
    use crate::random::ScriptedRandom;
    use rand::SeedableRng;

    fn controller(seed: u64) -> RoundController<StdRng, RecordingFeedback> {
        RoundController::new(
            GameConfig::default(),
            StdRng::seed_from_u64(seed),
            RecordingFeedback::default(),
        )
    }

    fn bubble_with(c: &RoundController<StdRng, RecordingFeedback>, want_target: bool) -> Bubble {
        *c.bubbles()
            .iter()
            .find(|b| (b.value == c.target_value()) == want_target)
            .unwrap()
    }

    #[test]
    fn inactive_controller_ignores_input() {
        let mut c = controller(1);
        let target = bubble_with(&c, true);
        assert_eq!(c.handle_bubble_click(target.id, target.value), ClickOutcome::Ignored);
        let round = c.round();
        c.skip_to_new_number();
        assert_eq!(c.round(), round);
        assert_eq!(c.score(), 0);
        assert!(c.audio().played.is_empty());
    }

    #[test]
    fn start_session_inits_audio_and_lays_out_a_round() {
        let mut c = controller(2);
        c.start_session("Ana");
        assert!(c.session().active);
        assert_eq!(c.round(), 2);
        assert_eq!(c.audio().init_calls, 1);
        assert_eq!(c.audio().played, vec![Sound::Match]);
        assert!(c.bubbles().iter().any(|b| b.value == c.target_value()));
    }

    #[test]
    fn popped_bubble_cannot_score_twice() {
        let mut c = controller(3);
        c.start_session("Ana");
        let t = bubble_with(&c, true);
        assert_eq!(c.handle_bubble_click(t.id, t.value), ClickOutcome::Match);
        assert_eq!(c.handle_bubble_click(t.id, t.value), ClickOutcome::Ignored);
        assert_eq!(c.score(), 1);
    }

    #[test]
    fn unknown_bubble_is_ignored() {
        let mut c = controller(4);
        c.start_session("Ana");
        assert_eq!(c.handle_bubble_click(99, 1), ClickOutcome::Ignored);
        assert!(c.feedback().is_none());
    }

    #[test]
    fn stale_error_reset_is_dropped_by_new_round() {
        let mut c = controller(5);
        c.start_session("Ana");
        let wrong = bubble_with(&c, false);
        c.handle_bubble_click(wrong.id, wrong.value);
        let old_round = c.round();
        c.skip_to_new_number();
        assert!(!c.timers.is_pending(&TimerRole::ErrorReset {
            bubble: wrong.id,
            round: old_round
        }));
        // even a reset that slipped through would find a different round
        c.fire(TimerRole::ErrorReset {
            bubble: wrong.id,
            round: old_round,
        });
        assert!(c.snapshot().states.iter().all(|s| *s == BubbleState::Idle));
    }

    #[test]
    fn error_reset_does_not_revive_a_popped_bubble() {
        let mut c = controller(6);
        c.start_session("Ana");
        let t = bubble_with(&c, true);
        // wrong value reported for the target bubble, then the right one
        c.handle_bubble_click(t.id, t.value + 100);
        assert_eq!(c.visual_state(t.id), BubbleState::Error);
        c.handle_bubble_click(t.id, t.value);
        assert_eq!(c.visual_state(t.id), BubbleState::Popped);
        c.advance_to(450.0);
        assert_eq!(c.visual_state(t.id), BubbleState::Popped);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut c = controller(7);
        c.advance_to(1000.0);
        c.advance_to(10.0);
        assert_eq!(c.now_ms(), 1000.0);
    }

    #[test]
    fn scripted_source_fixes_layout_and_target() {
        // 19 identity swaps keep the bubbles in order, then index 4 -> target 5.
        let mut draws: Vec<usize> = (1..20).rev().collect();
        draws.push(4);
        let c = RoundController::new(
            GameConfig::default(),
            ScriptedRandom::new(draws),
            SilentFeedback,
        );
        let values: Vec<u32> = c.bubbles().iter().map(|b| b.value).collect();
        assert_eq!(values, (1..=20).collect::<Vec<u32>>());
        assert_eq!(c.target_value(), 5);
    }
}
