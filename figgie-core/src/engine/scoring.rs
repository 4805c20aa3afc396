//! End-of-game scoring.
//!
//! Each goal-suit card pays [`CARD_BONUS`] out of the pot. What is left of
//! the pot goes to the player(s) holding the most goal-suit cards, split
//! with integer division; the leftover units go one each to the tied
//! winners in ascending seat order. Net score is trading P&L (including the
//! ante) plus card payout plus winner share, so scores always sum to zero.

use crate::domain::{Hand, Money, PlayerId, Suit};
use crate::engine::state::GameState;
use crate::rules::{SetupError, CARD_BONUS, POT};
use serde::{Deserialize, Serialize};

/// Every step of the payout, kept for the game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub goal_suit: Suit,
    pub goal_cards: Vec<u32>,
    pub card_payouts: Vec<Money>,
    /// Players holding the most goal-suit cards, ascending.
    pub winners: Vec<PlayerId>,
    /// Pot left after card payouts.
    pub remainder: Money,
    /// Share of the remainder per player (zero for non-winners).
    pub winner_shares: Vec<Money>,
    /// Net result per player.
    pub scores: Vec<Money>,
}

/// Score a finished game.
pub fn score(state: &GameState) -> ScoreBreakdown {
    tally(
        state.goal_suit(),
        state.hands(),
        state.balances(),
        state.rules().starting_money,
    )
}

/// Score from raw hands and balances.
///
/// `money` is each player's balance after the ante and all trading; it
/// must have one entry per hand.
pub fn score_hands(
    goal_suit: Suit,
    hands: &[Hand],
    money: &[Money],
    starting_money: Money,
) -> Result<ScoreBreakdown, SetupError> {
    if money.len() != hands.len() {
        return Err(SetupError::SeatMismatch {
            players: hands.len(),
            expected: hands.len(),
            actual: money.len(),
        });
    }
    Ok(tally(goal_suit, hands, money, starting_money))
}

fn tally(goal_suit: Suit, hands: &[Hand], money: &[Money], starting_money: Money) -> ScoreBreakdown {
    let goal_cards: Vec<u32> = hands.iter().map(|h| h[goal_suit]).collect();
    let card_payouts: Vec<Money> = goal_cards
        .iter()
        .map(|&n| Money::from(n) * CARD_BONUS)
        .collect();

    let most = goal_cards.iter().copied().max().unwrap_or(0);
    let winners: Vec<PlayerId> = goal_cards
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n == most)
        .map(|(i, _)| PlayerId(i))
        .collect();

    let remainder = POT - card_payouts.iter().sum::<Money>();
    let mut winner_shares = vec![0; hands.len()];
    for (winner, share) in winners.iter().zip(split_remainder(remainder, winners.len())) {
        winner_shares[winner.index()] = share;
    }

    let scores = money
        .iter()
        .zip(&card_payouts)
        .zip(&winner_shares)
        .map(|((&balance, &payout), &share)| balance - starting_money + payout + share)
        .collect();

    ScoreBreakdown {
        goal_suit,
        goal_cards,
        card_payouts,
        winners,
        remainder,
        winner_shares,
        scores,
    }
}

/// Split `remainder` across `ways` winners.
///
/// Shares differ by at most one unit, larger shares come first, and the
/// shares always add up to `remainder`.
pub fn split_remainder(remainder: Money, ways: usize) -> Vec<Money> {
    if ways == 0 {
        return Vec::new();
    }
    let ways_m = ways as Money;
    let base = remainder.div_euclid(ways_m);
    let leftover = remainder.rem_euclid(ways_m) as usize;
    (0..ways)
        .map(|i| base + Money::from(i < leftover))
        .collect()
}
