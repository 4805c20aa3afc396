//! Observer hooks: how logs and diagnostics watch a game without touching it.

use crate::domain::{Action, PlayerId, Trade};
use crate::engine::scoring::ScoreBreakdown;
use crate::engine::state::GameState;
use crate::policy::PolicyError;
use serde::{Deserialize, Serialize};

/// How a player's submission was resolved within a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAction {
    pub player: PlayerId,
    /// What the policy returned (`pass` if it faulted or was malformed).
    pub submitted: Action,
    /// What was applied: the submission, a crossing quote turned into a
    /// trade, or `pass` after a refusal.
    pub resolved: Action,
    pub valid: bool,
    /// Refusal reason, including parse errors for malformed actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `Err` or panic from the policy itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// Every action of one tick, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u32,
    pub actions: Vec<ResolvedAction>,
}

impl TickRecord {
    pub fn all_passed(&self) -> bool {
        self.actions.iter().all(|a| a.resolved.is_pass())
    }
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every player passed for the configured number of ticks in a row.
    AllPassed,
    /// The tick ceiling was reached.
    TickLimit,
}

/// Receives game events. Every hook defaults to doing nothing.
pub trait GameObserver {
    fn on_setup(&mut self, _state: &GameState) {}

    fn on_policy_fault(&mut self, _tick: u32, _player: PlayerId, _fault: &PolicyError) {}

    fn on_trade(&mut self, _trade: &Trade) {}

    fn on_tick(&mut self, _record: &TickRecord) {}

    fn on_finish(&mut self, _state: &GameState, _scoring: &ScoreBreakdown, _reason: EndReason) {}
}
