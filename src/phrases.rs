//! Feedback phrases shown after a click.
//!
//! Templates carry a `{name}` placeholder replaced by the player's name.
//! Selection is uniform over however many templates the book holds.

use crate::random::RandomSource;

pub const NAME_PLACEHOLDER: &str = "{name}";

pub const SUCCESS_PHRASES: &[&str] = &[
    "¡Buen trabajo {name}!",
    "¡Muy bien {name}!",
    "¡Fantástico {name}!",
    "¡Eres genial {name}!",
    "¡Sigue así {name}!",
    "¡Increíble {name}!",
    "¡Lo lograste {name}!",
];

pub const ENCOURAGEMENT_PHRASES: &[&str] = &[
    "¡Vamos {name}, puedes hacerlo!",
    "¡Inténtalo otra vez {name}!",
    "¡Busca bien {name}!",
    "¡Casi {name}, prueba otro!",
    "¡Tú puedes {name}!",
    "¡No te rindas {name}!",
];

/// Template lists per outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhraseBook {
    pub success: Vec<String>,
    pub encouragement: Vec<String>,
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self {
            success: SUCCESS_PHRASES.iter().map(|s| s.to_string()).collect(),
            encouragement: ENCOURAGEMENT_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PhraseBook {
    pub fn success_for<R: RandomSource + ?Sized>(&self, name: &str, rng: &mut R) -> String {
        pick_phrase(&self.success, name, rng)
    }

    pub fn encouragement_for<R: RandomSource + ?Sized>(&self, name: &str, rng: &mut R) -> String {
        pick_phrase(&self.encouragement, name, rng)
    }
}

/// Uniform pick with the first `{name}` substituted. Empty lists give an empty string.
pub fn pick_phrase<R, S>(templates: &[S], name: &str, rng: &mut R) -> String
where
    R: RandomSource + ?Sized,
    S: AsRef<str>,
{
    if templates.is_empty() {
        return String::new();
    }
    let template = templates[rng.index_below(templates.len())].as_ref();
    template.replacen(NAME_PLACEHOLDER, name, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn default_book_sizes() {
        let book = PhraseBook::default();
        assert_eq!(book.success.len(), 7);
        assert_eq!(book.encouragement.len(), 6);
        assert!(book.success.iter().all(|t| t.contains(NAME_PLACEHOLDER)));
        assert!(book.encouragement.iter().all(|t| t.contains(NAME_PLACEHOLDER)));
    }

    #[test]
    fn substitutes_name() {
        let mut rng = ScriptedRandom::new(vec![1]);
        let text = PhraseBook::default().success_for("Ana", &mut rng);
        assert_eq!(text, "¡Muy bien Ana!");
    }

    #[test]
    fn selection_covers_added_templates_and_fills_first_placeholder() {
        let mut book = PhraseBook::default();
        book.success.push("{name}, {name}!".to_string());
        // index 7 only exists after the addition
        let mut rng = ScriptedRandom::new(vec![7]);
        assert_eq!(book.success_for("Leo", &mut rng), "Leo, {name}!");
    }

    #[test]
    fn empty_list_is_empty_message() {
        let mut rng = ScriptedRandom::new(vec![4]);
        let empty: [&str; 0] = [];
        assert_eq!(pick_phrase(&empty, "Ana", &mut rng), "");
        assert_eq!(rng.consumed(), 0);
    }
}
