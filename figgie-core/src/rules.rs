//! Game constants and the tunable rule set.

use crate::domain::{Money, Suit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pot formed by the antes. Fixed for every table size.
pub const POT: Money = 200;

/// Paid per goal-suit card held at the end of the game.
pub const CARD_BONUS: Money = 10;

pub const DECK_SIZE: u32 = 40;

/// Suit sizes before shuffling onto suits. Exactly one 12, one 8, two 10s.
pub const SUIT_SIZES: [u32; 4] = [8, 10, 10, 12];

pub const VALID_PLAYER_COUNTS: [usize; 2] = [4, 5];

/// Errors that abort a game before the first tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Figgie requires 4 or 5 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("expected {expected} entries for {players} players, got {actual}")]
    SeatMismatch {
        players: usize,
        expected: usize,
        actual: usize,
    },

    #[error("hands hold {held} {suit} but the deck has {dealt}")]
    CardCountMismatch { suit: Suit, held: u32, dealt: u32 },

    #[error("invalid rules: {0}")]
    InvalidRules(String),
}

/// Reject table sizes the pot cannot be split across.
pub fn check_player_count(num_players: usize) -> Result<(), SetupError> {
    if VALID_PLAYER_COUNTS.contains(&num_players) {
        Ok(())
    } else {
        Err(SetupError::InvalidPlayerCount(num_players))
    }
}

/// Ante per player: 50 at a 4-player table, 40 at a 5-player table.
pub fn ante(num_players: usize) -> Result<Money, SetupError> {
    check_player_count(num_players)?;
    Ok(POT / num_players as Money)
}

/// Tunable parts of the game. Defaults match the standard game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Balance before the ante is taken.
    pub starting_money: Money,
    /// Hard ceiling on ticks per game.
    pub max_ticks: u32,
    /// Consecutive all-pass ticks that end the game.
    pub consecutive_pass_limit: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_money: 350,
            max_ticks: 200,
            consecutive_pass_limit: 3,
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.max_ticks == 0 {
            return Err(SetupError::InvalidRules("max_ticks must be at least 1".into()));
        }
        if self.consecutive_pass_limit == 0 {
            return Err(SetupError::InvalidRules(
                "consecutive_pass_limit must be at least 1".into(),
            ));
        }
        let largest_ante = POT / VALID_PLAYER_COUNTS[0] as Money;
        if self.starting_money < largest_ante {
            return Err(SetupError::InvalidRules(format!(
                "starting_money {} cannot cover an ante of {largest_ante}",
                self.starting_money
            )));
        }
        Ok(())
    }

    /// Balance each player trades with once the ante is in the pot.
    pub fn money_after_ante(&self, num_players: usize) -> Result<Money, SetupError> {
        Ok(self.starting_money - ante(num_players)?)
    }
}
