//! Deck generation and dealing.
//!
//! A deck is 40 cards whose suit sizes are a random permutation of
//! `[8, 10, 10, 12]`. The goal suit is the partner (same color) of the
//! 12-card suit, so it always holds 8 or 10 cards.

use crate::domain::{Hand, Suit, SuitMap};
use crate::rules::{check_player_count, SetupError, DECK_SIZE, SUIT_SIZES};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of cards of each suit in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckDistribution {
    counts: SuitMap<u32>,
}

impl DeckDistribution {
    /// Shuffle the standard suit sizes onto the four suits.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut sizes = SUIT_SIZES;
        sizes.shuffle(rng);
        let mut next = sizes.into_iter();
        let counts = SuitMap::from_fn(|_| next.next().unwrap_or_default());
        Self { counts }
    }

    /// Build from explicit counts. Fails unless the sizes are a permutation
    /// of the standard ones.
    pub fn from_counts(counts: SuitMap<u32>) -> Result<Self, SetupError> {
        let mut sizes: Vec<u32> = counts.values().copied().collect();
        sizes.sort_unstable();
        if sizes != SUIT_SIZES {
            return Err(SetupError::InvalidRules(format!(
                "suit sizes {sizes:?} are not a permutation of {SUIT_SIZES:?}"
            )));
        }
        Ok(Self { counts })
    }

    pub fn count(&self, suit: Suit) -> u32 {
        self.counts[suit]
    }

    pub fn counts(&self) -> &SuitMap<u32> {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.total()
    }

    /// The suit holding 12 cards.
    pub fn long_suit(&self) -> Suit {
        Suit::ALL
            .into_iter()
            .max_by_key(|&suit| self.counts[suit])
            .unwrap_or(Suit::Spades)
    }

    /// Same color as the 12-card suit, but not that suit.
    pub fn goal_suit(&self) -> Suit {
        self.long_suit().same_color_partner()
    }
}

/// Flatten the distribution into single cards, shuffle, and deal round-robin.
///
/// Every player receives `40 / num_players` cards; cards that do not divide
/// evenly stay undealt.
pub fn deal<R: Rng + ?Sized>(
    distribution: &DeckDistribution,
    num_players: usize,
    rng: &mut R,
) -> Result<Vec<Hand>, SetupError> {
    check_player_count(num_players)?;

    let mut cards: Vec<Suit> = Suit::ALL
        .into_iter()
        .flat_map(|suit| std::iter::repeat(suit).take(distribution.count(suit) as usize))
        .collect();
    cards.shuffle(rng);

    let per_player = DECK_SIZE as usize / num_players;
    let mut hands = vec![Hand::default(); num_players];
    for (i, suit) in cards.into_iter().take(per_player * num_players).enumerate() {
        hands[i % num_players][suit] += 1;
    }
    Ok(hands)
}
