//! Per-round log record.
//!
//! [`GameLog`] is a [`GameObserver`] that keeps everything needed to replay
//! or visualise a round: the setup, every tick in resolution order, every
//! trade, and the final hands, money and scores.

use crate::deck::DeckDistribution;
use crate::domain::{Hand, Money, PlayerId, Suit, Trade};
use crate::engine::observer::{EndReason, GameObserver, TickRecord};
use crate::engine::scoring::ScoreBreakdown;
use crate::engine::state::GameState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupSnapshot {
    pub timestamp: DateTime<Utc>,
    pub num_players: usize,
    pub suit_counts: DeckDistribution,
    pub goal_suit: Suit,
    pub initial_hands: Vec<Hand>,
    pub initial_money: Vec<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogEvent {
    Tick(TickRecord),
    Trade(Trade),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSnapshot {
    pub ticks_played: u32,
    pub end_reason: EndReason,
    pub final_hands: Vec<Hand>,
    pub final_money: Vec<Money>,
    pub scores: Vec<Money>,
    pub scoring: ScoreBreakdown,
}

/// Full record of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub setup: Option<SetupSnapshot>,
    pub events: Vec<LogEvent>,
    pub outcome: Option<FinalSnapshot>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.events.iter().filter_map(|e| match e {
            LogEvent::Trade(trade) => Some(trade),
            LogEvent::Tick(_) => None,
        })
    }

    pub fn ticks(&self) -> impl Iterator<Item = &TickRecord> {
        self.events.iter().filter_map(|e| match e {
            LogEvent::Tick(record) => Some(record),
            LogEvent::Trade(_) => None,
        })
    }

    /// Submissions that were downgraded to `pass`, with their reason.
    pub fn rejections(&self) -> impl Iterator<Item = (u32, PlayerId, &str)> {
        self.ticks().flat_map(|record| {
            record.actions.iter().filter_map(move |a| {
                a.error.as_deref().map(|reason| (record.tick, a.player, reason))
            })
        })
    }

    pub fn is_complete(&self) -> bool {
        self.setup.is_some() && self.outcome.is_some()
    }
}

impl GameObserver for GameLog {
    fn on_setup(&mut self, state: &GameState) {
        self.setup = Some(SetupSnapshot {
            timestamp: Utc::now(),
            num_players: state.num_players(),
            suit_counts: *state.distribution(),
            goal_suit: state.goal_suit(),
            initial_hands: state.hands().to_vec(),
            initial_money: state.balances().to_vec(),
        });
    }

    fn on_trade(&mut self, trade: &Trade) {
        self.events.push(LogEvent::Trade(*trade));
    }

    fn on_tick(&mut self, record: &TickRecord) {
        self.events.push(LogEvent::Tick(record.clone()));
    }

    fn on_finish(&mut self, state: &GameState, scoring: &ScoreBreakdown, reason: EndReason) {
        self.outcome = Some(FinalSnapshot {
            ticks_played: state.tick() + 1,
            end_reason: reason,
            final_hands: state.hands().to_vec(),
            final_money: state.balances().to_vec(),
            scores: scoring.scores.clone(),
            scoring: scoring.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Action;
    use crate::engine::observer::ResolvedAction;

    fn pass(player: usize) -> ResolvedAction {
        ResolvedAction {
            player: PlayerId(player),
            submitted: Action::Pass,
            resolved: Action::Pass,
            valid: true,
            error: None,
            fault: None,
        }
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let mut log = GameLog::new();
        log.on_tick(&TickRecord { tick: 0, actions: vec![pass(0)] });
        log.on_trade(&Trade {
            suit: Suit::Hearts,
            price: 7,
            buyer: PlayerId(1),
            seller: PlayerId(2),
            tick: 0,
        });

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["events"][0]["type"], "tick");
        assert_eq!(json["events"][1]["type"], "trade");
        assert_eq!(json["events"][1]["suit"], "hearts");
        assert_eq!(json["events"][0]["actions"][0]["resolved"]["type"], "pass");
        assert!(json["events"][0]["actions"][0].get("error").is_none());
    }

    #[test]
    fn rejections_list_downgraded_actions() {
        let mut log = GameLog::new();
        let rejected = ResolvedAction {
            submitted: Action::Buy { suit: Suit::Clubs },
            valid: false,
            error: Some("no resting ask for clubs".into()),
            ..pass(3)
        };
        log.on_tick(&TickRecord { tick: 4, actions: vec![pass(0), rejected] });

        let found: Vec<_> = log.rejections().collect();
        assert_eq!(found, vec![(4, PlayerId(3), "no resting ask for clubs")]);
        assert_eq!(log.trades().count(), 0);
        assert!(!log.is_complete());
    }
}
