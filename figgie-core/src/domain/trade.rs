//! Trade: an executed transfer of one card for money.

use super::action::Money;
use super::ids::PlayerId;
use super::suit::Suit;
use serde::{Deserialize, Serialize};

/// One completed trade. Appended to the history and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub suit: Suit,
    pub price: Money,
    pub buyer: PlayerId,
    pub seller: PlayerId,
    pub tick: u32,
}
