//! Tunable timings and phrases.

use crate::phrases::PhraseBook;

/// Delay between a correct pick and the next round (pop animation length).
pub const REGENERATION_DELAY_MS: f64 = 600.0;
/// How long a wrong bubble wiggles before going back to idle.
pub const ERROR_RESET_DELAY_MS: f64 = 400.0;
/// How long a feedback phrase stays on screen.
pub const FEEDBACK_DURATION_MS: f64 = 5000.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub regeneration_delay_ms: f64,
    pub error_reset_delay_ms: f64,
    pub feedback_duration_ms: f64,
    pub phrases: PhraseBook,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            regeneration_delay_ms: REGENERATION_DELAY_MS,
            error_reset_delay_ms: ERROR_RESET_DELAY_MS,
            feedback_duration_ms: FEEDBACK_DURATION_MS,
            phrases: PhraseBook::default(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl GameConfig {
    /// Parses a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::error::GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl GameConfig {
    /// Rejects negative or non-finite delays.
    pub fn validate(&self) -> Result<(), crate::error::GameError> {
        let delays = [
            ("regeneration_delay_ms", self.regeneration_delay_ms),
            ("error_reset_delay_ms", self.error_reset_delay_ms),
            ("feedback_duration_ms", self.feedback_duration_ms),
        ];
        for (field, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::error::GameError::InvalidDelay { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game_timings() {
        let c = GameConfig::default();
        assert_eq!(c.regeneration_delay_ms, 600.0);
        assert_eq!(c.error_reset_delay_ms, 400.0);
        assert_eq!(c.feedback_duration_ms, 5000.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn negative_delay_is_rejected() {
        let c = GameConfig {
            error_reset_delay_ms: -1.0,
            ..GameConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_only_given_fields() {
        let c = GameConfig::from_json(r#"{"feedback_duration_ms": 2000, "phrases": {"success": ["Bravo {name}"]}}"#)
            .unwrap();
        assert_eq!(c.feedback_duration_ms, 2000.0);
        assert_eq!(c.regeneration_delay_ms, 600.0);
        assert_eq!(c.phrases.success, vec!["Bravo {name}".to_string()]);
        assert_eq!(c.phrases.encouragement.len(), 6);
    }
}
