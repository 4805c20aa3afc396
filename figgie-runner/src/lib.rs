//! Figgie Runner: match orchestration on top of `figgie-core`.
//!
//! This crate provides:
//! - Match configuration (TOML or built from flags)
//! - Built-in policies (starter, random, passive)
//! - Multi-round runner, parallel over rounds
//! - Round log export (JSON game log, CSV trade tape)
//! - JSONL match history with per-policy summaries

pub mod bots;
pub mod config;
pub mod export;
pub mod history;
pub mod runner;

pub use bots::{PassiveBot, PolicyKind, RandomBot, StarterBot};
pub use config::{ConfigError, MatchConfig, MatchId, PlayerConfig};
pub use export::{export_round_json, export_trades_csv, load_round, save_round};
pub use history::{summary_by_policy, HistoryEntry, MatchHistory, PolicySummary};
pub use runner::{play_round, run_match, sole_winner, MatchSummary, RoundResult, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn match_types_are_send_sync() {
        assert_send::<MatchConfig>();
        assert_sync::<MatchConfig>();
        assert_send::<MatchSummary>();
        assert_sync::<MatchSummary>();
        assert_send::<RoundResult>();
        assert_sync::<RoundResult>();
        assert_send::<RunError>();
    }
}
