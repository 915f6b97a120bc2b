//! Bubbles, their palette and per-round generation.

use crate::random::RandomSource;

/// Number of bubbles on screen in every round. Values run `1..=BUBBLE_COUNT`.
pub const BUBBLE_COUNT: usize = 20;

/// Identifier of a bubble, unique within a round (`0..BUBBLE_COUNT`).
pub type BubbleId = u32;

/// Fixed bubble palette. Colors are handed out cyclically by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BubbleColor {
    Red,
    Orange,
    Amber,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl BubbleColor {
    pub const PALETTE: [BubbleColor; 15] = [
        BubbleColor::Red,
        BubbleColor::Orange,
        BubbleColor::Amber,
        BubbleColor::Green,
        BubbleColor::Emerald,
        BubbleColor::Teal,
        BubbleColor::Cyan,
        BubbleColor::Sky,
        BubbleColor::Blue,
        BubbleColor::Indigo,
        BubbleColor::Violet,
        BubbleColor::Purple,
        BubbleColor::Fuchsia,
        BubbleColor::Pink,
        BubbleColor::Rose,
    ];

    /// Palette entry for a pre-shuffle position.
    pub fn for_index(i: usize) -> Self {
        Self::PALETTE[i % Self::PALETTE.len()]
    }

    /// CSS fill used by the canvas renderer.
    pub fn css(self) -> &'static str {
        match self {
            BubbleColor::Red => "#f87171",
            BubbleColor::Orange => "#fb923c",
            BubbleColor::Amber => "#fbbf24",
            BubbleColor::Green => "#4ade80",
            BubbleColor::Emerald => "#34d399",
            BubbleColor::Teal => "#2dd4bf",
            BubbleColor::Cyan => "#22d3ee",
            BubbleColor::Sky => "#38bdf8",
            BubbleColor::Blue => "#60a5fa",
            BubbleColor::Indigo => "#818cf8",
            BubbleColor::Violet => "#a78bfa",
            BubbleColor::Purple => "#c084fc",
            BubbleColor::Fuchsia => "#e879f9",
            BubbleColor::Pink => "#f472b6",
            BubbleColor::Rose => "#fb7185",
        }
    }
}

/// A labeled bubble. Immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bubble {
    pub id: BubbleId,
    pub value: u32,
    pub color: BubbleColor,
}

/// Visual state of a bubble as seen by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BubbleState {
    #[default]
    Idle,
    /// Correct pick; plays the pop animation until the round is replaced.
    Popped,
    /// Wrong pick; wiggles until the error reset fires.
    Error,
}

/// Builds a fresh round of bubbles: bubble `i` gets id `i`, value `i + 1` and
/// palette color `i`, then the whole sequence is shuffled so id, value and
/// color travel together.
pub fn generate_bubbles<R: RandomSource + ?Sized>(rng: &mut R) -> Vec<Bubble> {
    let mut bubbles: Vec<Bubble> = (0..BUBBLE_COUNT)
        .map(|i| Bubble {
            id: i as BubbleId,
            value: i as u32 + 1,
            color: BubbleColor::for_index(i),
        })
        .collect();
    shuffle(&mut bubbles, rng);
    bubbles
}

/// Fisher-Yates over the injected source.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index_below(i + 1);
        items.swap(i, j);
    }
}

/// Uniform pick over the bubble list (duplicate values weighted by multiplicity).
pub fn pick_target<R: RandomSource + ?Sized>(bubbles: &[Bubble], rng: &mut R) -> Option<u32> {
    if bubbles.is_empty() {
        return None;
    }
    Some(bubbles[rng.index_below(bubbles.len())].value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn generated_round_has_ids_and_values_once_each() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let bubbles = generate_bubbles(&mut rng);
            assert_eq!(bubbles.len(), BUBBLE_COUNT);
            let values: HashSet<u32> = bubbles.iter().map(|b| b.value).collect();
            assert_eq!(values, (1..=20).collect::<HashSet<u32>>());
            let ids: HashSet<BubbleId> = bubbles.iter().map(|b| b.id).collect();
            assert_eq!(ids.len(), BUBBLE_COUNT);
        }
    }

    #[test]
    fn colors_follow_the_pre_shuffle_position() {
        let mut rng = StdRng::seed_from_u64(11);
        for b in generate_bubbles(&mut rng) {
            assert_eq!(b.id + 1, b.value);
            assert_eq!(b.color, BubbleColor::for_index(b.id as usize));
        }
        // value 16 wraps back to the first palette entry
        assert_eq!(BubbleColor::for_index(15), BubbleColor::Red);
    }

    #[test]
    fn zero_draws_rotate_the_sequence() {
        // j = 0 at every step moves each tail element to the front in turn.
        let mut rng = ScriptedRandom::new(vec![0]);
        let mut items = [1, 2, 3, 4];
        shuffle(&mut items, &mut rng);
        assert_eq!(items, [2, 3, 4, 1]);
    }

    #[test]
    fn identity_draws_keep_order() {
        // j = i keeps every element in place.
        let draws: Vec<usize> = (1..BUBBLE_COUNT).rev().collect();
        let mut rng = ScriptedRandom::new(draws);
        let bubbles = generate_bubbles(&mut rng);
        let values: Vec<u32> = bubbles.iter().map(|b| b.value).collect();
        assert_eq!(values, (1..=20).collect::<Vec<u32>>());
    }

    #[test]
    fn target_is_weighted_by_multiplicity() {
        let bubbles = [
            Bubble { id: 0, value: 3, color: BubbleColor::Red },
            Bubble { id: 1, value: 3, color: BubbleColor::Orange },
            Bubble { id: 2, value: 9, color: BubbleColor::Amber },
        ];
        let mut rng = ScriptedRandom::new(vec![0, 1, 2]);
        let picks: Vec<u32> = (0..3).filter_map(|_| pick_target(&bubbles, &mut rng)).collect();
        assert_eq!(picks, vec![3, 3, 9]);
        assert_eq!(pick_target(&[], &mut rng), None);
    }
}
