//! Match runner: deals, plays and tallies every round of a match.
//!
//! Each round gets its own deal, resolution-order RNG and freshly built
//! policies, all seeded from the match's [`RngHierarchy`]. Rounds are
//! independent, so they run on the rayon pool when `parallel` is set and
//! produce the same results either way.

use std::path::Path;

use chrono::{DateTime, Utc};
use figgie_core::domain::{Money, PlayerId, Suit};
use figgie_core::engine::{run_game, EndReason, GameLog, GameObserver, GameState};
use figgie_core::policy::Policy;
use figgie_core::rng::{RngHierarchy, RngStream};
use figgie_core::rules::SetupError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, MatchConfig, MatchId};
use crate::export::save_round;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("round {round}: {message}")]
    Export { round: u32, message: String },
}

/// Current schema version for persisted summaries.
pub const SCHEMA_VERSION: u32 = 1;

/// Outcome of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub goal_suit: Suit,
    pub scores: Vec<Money>,
    pub trades: usize,
    pub ticks: u32,
    pub end_reason: EndReason,
    /// Sole top scorer, `None` on a draw.
    pub winner: Option<PlayerId>,
}

impl RoundResult {
    fn new(
        round: u32,
        goal_suit: Suit,
        scores: Vec<Money>,
        trades: usize,
        ticks: u32,
        end_reason: EndReason,
    ) -> Self {
        let winner = sole_winner(&scores);
        Self {
            round,
            goal_suit,
            scores,
            trades,
            ticks,
            end_reason,
            winner,
        }
    }
}

/// Seat with the strictly highest score, if there is one.
pub fn sole_winner(scores: &[Money]) -> Option<PlayerId> {
    let best = *scores.iter().max()?;
    let mut top = scores.iter().enumerate().filter(|&(_, &s)| s == best);
    match (top.next(), top.next()) {
        (Some((seat, _)), None) => Some(PlayerId(seat)),
        _ => None,
    }
}

/// Tallies for a whole match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub match_id: MatchId,
    pub started_at: DateTime<Utc>,
    pub seed: u64,
    pub players: Vec<String>,
    pub rounds: Vec<RoundResult>,
    pub total_scores: Vec<Money>,
    pub round_wins: Vec<u32>,
    pub draws: u32,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl MatchSummary {
    pub fn from_rounds(
        config: &MatchConfig,
        started_at: DateTime<Utc>,
        rounds: Vec<RoundResult>,
    ) -> Self {
        let n = config.num_players();
        let mut total_scores = vec![0; n];
        let mut round_wins = vec![0; n];
        let mut draws = 0;

        for round in &rounds {
            for (total, score) in total_scores.iter_mut().zip(&round.scores) {
                *total += score;
            }
            match round.winner {
                Some(seat) => round_wins[seat.index()] += 1,
                None => draws += 1,
            }
        }

        Self {
            schema_version: SCHEMA_VERSION,
            match_id: config.match_id(),
            started_at,
            seed: config.seed,
            players: config.player_names(),
            rounds,
            total_scores,
            round_wins,
            draws,
        }
    }

    /// Seat with the best total score, if unique.
    pub fn leader(&self) -> Option<PlayerId> {
        sole_winner(&self.total_scores)
    }
}

/// Play every round of `config`.
pub fn run_match(config: &MatchConfig) -> Result<MatchSummary, RunError> {
    config.validate()?;
    let started_at = Utc::now();
    let hierarchy = RngHierarchy::new(config.seed);

    info!(
        match_id = %config.match_id(),
        rounds = config.rounds,
        players = config.num_players(),
        parallel = config.parallel,
        "match started"
    );

    let rounds: Vec<RoundResult> = if config.parallel {
        (0..config.rounds)
            .into_par_iter()
            .map(|round| play_round(config, &hierarchy, round))
            .collect::<Result<_, _>>()?
    } else {
        (0..config.rounds)
            .map(|round| play_round(config, &hierarchy, round))
            .collect::<Result<_, _>>()?
    };

    let summary = MatchSummary::from_rounds(config, started_at, rounds);
    info!(
        totals = ?summary.total_scores,
        wins = ?summary.round_wins,
        draws = summary.draws,
        "match finished"
    );
    Ok(summary)
}

/// Play a single round. Writes its logs when the config has an output dir.
pub fn play_round(
    config: &MatchConfig,
    hierarchy: &RngHierarchy,
    round: u32,
) -> Result<RoundResult, RunError> {
    let round_key = u64::from(round);
    let state = GameState::deal(
        config.num_players(),
        config.rules.clone(),
        &mut hierarchy.rng_for(round_key, RngStream::Deal),
    )?;

    let policies: Vec<Box<dyn Policy>> = config
        .players
        .iter()
        .enumerate()
        .map(|(seat, player)| {
            player
                .policy
                .build(hierarchy.sub_seed(round_key, RngStream::Policy(PlayerId(seat))))
        })
        .collect();

    let order_rng = hierarchy.rng_for(round_key, RngStream::TickOrder);
    let mut log = GameLog::new();
    let observer: Option<&mut dyn GameObserver> = match config.output_dir {
        Some(_) => Some(&mut log),
        None => None,
    };
    let result = run_game(state, policies, order_rng, observer)?;

    if let Some(dir) = &config.output_dir {
        write_round(dir, round, &log)?;
    }

    debug!(
        round,
        goal = %result.state.goal_suit(),
        ticks = result.ticks_played,
        trades = result.state.trades().len(),
        scores = ?result.scores(),
        "round finished"
    );

    Ok(RoundResult::new(
        round,
        result.state.goal_suit(),
        result.scores().to_vec(),
        result.state.trades().len(),
        result.ticks_played,
        result.end_reason,
    ))
}

fn write_round(dir: &Path, round: u32, log: &GameLog) -> Result<(), RunError> {
    save_round(dir, round, log)
        .map(|_| ())
        .map_err(|err| RunError::Export {
            round,
            message: format!("{err:#}"),
        })
}
