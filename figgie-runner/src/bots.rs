//! Built-in policies.
//!
//! - [`StarterBot`]: guesses the goal suit from its own hand, buys cheap
//!   likely-goal cards, unloads the rest, and keeps quotes on the book
//! - [`RandomBot`]: random actions, most of them invalid; a fuzzing opponent
//! - [`PassiveBot`]: always passes

use std::fmt;
use std::str::FromStr;

use figgie_core::domain::{Action, Money, Suit};
use figgie_core::policy::{Policy, PolicyError, View};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Which built-in policy sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Starter,
    Random,
    Passive,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Starter, PolicyKind::Random, PolicyKind::Passive];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Starter => "starter",
            PolicyKind::Random => "random",
            PolicyKind::Passive => "passive",
        }
    }

    /// Build a fresh policy. `seed` drives any randomness inside it.
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Starter => Box::new(StarterBot::new(seed)),
            PolicyKind::Random => Box::new(RandomBot::new(seed)),
            PolicyKind::Passive => Box::new(PassiveBot),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

// ─── Starter ────────────────────────────────────────────────────────

/// Heuristic trader.
///
/// The suit it holds most of is taken to be the 12-card suit, so its
/// partner is the goal guess. Confidence grows with how lopsided the hand
/// is. Decisions, in priority order:
///
/// 1. Lift asks on the goal guess that are below its value
/// 2. Hit bids that pay enough for what it holds
/// 3. Post or undercut asks on other suits it holds
/// 4. Post or outbid the bid on the goal guess
/// 5. Now and then, bid low on an empty suit for liquidity
#[derive(Debug, Clone)]
pub struct StarterBot {
    rng: StdRng,
}

/// Estimated goal suit and how sure the bot is about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalEstimate {
    pub suit: Suit,
    pub confidence: f64,
}

const MAX_CONFIDENCE: f64 = 0.8;
const LIQUIDITY_BID_CHANCE: f64 = 0.1;

impl StarterBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn estimate_goal(view: &View<'_>) -> GoalEstimate {
        let mut counts: Vec<(u32, Suit)> = Suit::ALL.iter().map(|&s| (view.hand[s], s)).collect();
        // Most cards first; ties keep suit order.
        counts.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let (most, long) = counts[0];
        let second = counts[1].0;
        let confidence = (0.3 + f64::from(most - second) * 0.1).min(MAX_CONFIDENCE);
        GoalEstimate {
            suit: long.same_color_partner(),
            confidence,
        }
    }

    /// What one card of `suit` is worth to the bot.
    pub fn card_value(suit: Suit, goal: GoalEstimate) -> Money {
        if suit == goal.suit {
            (10.0 + 25.0 * goal.confidence) as Money
        } else {
            ((5.0 * (1.0 - goal.confidence)) as Money).max(1)
        }
    }

    fn should_buy(suit: Suit, price: Money, goal: GoalEstimate) -> bool {
        let value = Self::card_value(suit, goal) as f64;
        if suit == goal.suit {
            (price as f64) < value * 1.2
        } else {
            (price as f64) < value * 0.5
        }
    }

    fn should_sell(suit: Suit, price: Money, held: u32, goal: GoalEstimate) -> bool {
        let value = Self::card_value(suit, goal) as f64;
        let price = price as f64;
        if suit == goal.suit {
            (held > 3 && price >= value * 0.8) || price >= value * 1.5
        } else {
            price >= value * 0.8
        }
    }
}

impl Policy for StarterBot {
    fn name(&self) -> &str {
        "starter"
    }

    fn decide(&mut self, view: &View<'_>) -> Result<Action, PolicyError> {
        let me = view.position;
        let goal = Self::estimate_goal(view);

        // 1. Buy underpriced goal cards.
        let goal_book = &view.books[goal.suit];
        if let Some(ask) = goal_book.ask {
            if ask.owner != me
                && ask.price <= view.money
                && Self::should_buy(goal.suit, ask.price, goal)
            {
                return Ok(Action::Buy { suit: goal.suit });
            }
        }

        // 2. Sell into generous bids.
        for suit in Suit::ALL {
            let held = view.hand[suit];
            if let Some(bid) = view.books[suit].bid {
                if bid.owner != me && held > 0 && Self::should_sell(suit, bid.price, held, goal) {
                    return Ok(Action::Sell { suit });
                }
            }
        }

        // 3. Offer the suits it does not want.
        for suit in Suit::ALL {
            if suit == goal.suit || view.hand[suit] == 0 {
                continue;
            }
            let book = &view.books[suit];
            let value = Self::card_value(suit, goal);
            match book.ask {
                None => {
                    return Ok(Action::Ask { suit, price: (value + 2).max(5) });
                }
                Some(ask) if ask.owner != me => {
                    let price = ask.price - 1;
                    let floor = book.bid.map_or(1, |bid| bid.price + 1);
                    if price >= floor && price >= value {
                        return Ok(Action::Ask { suit, price });
                    }
                }
                Some(_) => {}
            }
        }

        // 4. Bid for the goal guess, keeping a reserve.
        if view.money > 50 {
            let value = Self::card_value(goal.suit, goal);
            match goal_book.bid {
                None => {
                    let price = (value - 5).min(view.money / 4);
                    if price > 0 {
                        return Ok(Action::Bid { suit: goal.suit, price });
                    }
                }
                Some(bid) if bid.owner != me => {
                    let price = bid.price + 1;
                    let ceiling = goal_book.ask.map_or(view.money, |ask| ask.price - 1);
                    if price <= ceiling && price <= value && price <= view.money {
                        return Ok(Action::Bid { suit: goal.suit, price });
                    }
                }
                Some(_) => {}
            }
        }

        // 5. Liquidity.
        if view.money > 30 && self.rng.gen_bool(LIQUIDITY_BID_CHANCE) {
            let empty = Suit::ALL
                .into_iter()
                .find(|&s| s != goal.suit && view.books[s].bid.is_none());
            if let Some(suit) = empty {
                let price = self.rng.gen_range(1..=5);
                return Ok(Action::Bid { suit, price });
            }
        }

        Ok(Action::Pass)
    }
}

// ─── Random ─────────────────────────────────────────────────────────

/// Submits uniformly random actions; passes 40% of the time.
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomBot {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, view: &View<'_>) -> Result<Action, PolicyError> {
        if self.rng.gen_bool(0.4) {
            return Ok(Action::Pass);
        }
        let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
        let ceiling = view.money.clamp(1, 30);
        Ok(match self.rng.gen_range(0..4) {
            0 => Action::Bid { suit, price: self.rng.gen_range(1..=ceiling) },
            1 => Action::Ask { suit, price: self.rng.gen_range(1..=30) },
            2 => Action::Buy { suit },
            _ => Action::Sell { suit },
        })
    }
}

// ─── Passive ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveBot;

impl Policy for PassiveBot {
    fn name(&self) -> &str {
        "passive"
    }

    fn decide(&mut self, _view: &View<'_>) -> Result<Action, PolicyError> {
        Ok(Action::Pass)
    }
}
