//! Tick scheduler: the game's state machine.
//!
//! Each tick runs four phases:
//!
//! 1. Collect: every policy decides against the same start-of-tick state
//! 2. Order: the submissions are shuffled with the scheduler's seeded RNG
//! 3. Resolve: each submission is re-validated against the live state and
//!    executed, or downgraded to `pass`
//! 4. Log and check for termination
//!
//! Policy faults never escape: an `Err` or a panic from `decide` becomes a
//! `pass`. A malformed action is refused like any invalid one, with its
//! parse error as the reason. The game is scored exactly once, when it turns terminal.

use crate::domain::{Action, ActionError, Money, PlayerId};
use crate::engine::executor::execute;
use crate::engine::observer::{EndReason, GameObserver, ResolvedAction, TickRecord};
use crate::engine::scoring::{score, ScoreBreakdown};
use crate::engine::state::GameState;
use crate::engine::validation::{cross_to_trade, validate};
use crate::policy::{Policy, PolicyError};
use crate::rules::SetupError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Outcome of a finished game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub state: GameState,
    pub scoring: ScoreBreakdown,
    pub ticks_played: u32,
    pub end_reason: EndReason,
}

impl GameResult {
    pub fn scores(&self) -> &[Money] {
        &self.scoring.scores
    }
}

/// What a policy handed in during collection.
enum Submission {
    Action(Action),
    /// Unparseable action: refused with its reason, like any invalid action.
    Malformed(ActionError),
    /// `Err` or panic from `decide`.
    Fault(String),
}

/// Drives one game from the deal to scoring.
pub struct TickScheduler<'a> {
    state: GameState,
    policies: Vec<Box<dyn Policy>>,
    rng: StdRng,
    observer: Option<&'a mut dyn GameObserver>,
    all_pass_streak: u32,
    started: bool,
    end_reason: Option<EndReason>,
    scoring: Option<ScoreBreakdown>,
}

impl<'a> TickScheduler<'a> {
    /// One policy per seat, in seat order. `rng` decides resolution order.
    pub fn new(
        state: GameState,
        policies: Vec<Box<dyn Policy>>,
        rng: StdRng,
    ) -> Result<Self, SetupError> {
        if policies.len() != state.num_players() {
            return Err(SetupError::SeatMismatch {
                players: state.num_players(),
                expected: state.num_players(),
                actual: policies.len(),
            });
        }
        Ok(Self {
            state,
            policies,
            rng,
            observer: None,
            all_pass_streak: 0,
            started: false,
            end_reason: None,
            scoring: None,
        })
    }

    pub fn with_observer(mut self, observer: &'a mut dyn GameObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn all_pass_streak(&self) -> u32 {
        self.all_pass_streak
    }

    /// Play one tick. Returns `None` once the game is over.
    pub fn step(&mut self) -> Option<TickRecord> {
        if self.state.is_terminal() {
            return None;
        }
        if !self.started {
            self.started = true;
            info!(
                players = self.state.num_players(),
                goal = %self.state.goal_suit(),
                "game started"
            );
            if let Some(observer) = self.observer.as_deref_mut() {
                observer.on_setup(&self.state);
            }
        }

        let tick = self.state.tick;

        // ─── Phase 1: Collect ───
        let mut submissions = self.collect(tick);

        // ─── Phase 2: Order ───
        submissions.shuffle(&mut self.rng);

        // ─── Phase 3: Resolve ───
        let mut actions = Vec::with_capacity(submissions.len());
        for (player, submission) in submissions {
            actions.push(self.resolve(tick, player, submission));
        }

        // ─── Phase 4: Log + termination ───
        let record = TickRecord { tick, actions };
        debug!(tick, all_passed = record.all_passed(), "tick resolved");
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_tick(&record);
        }

        if record.all_passed() {
            self.all_pass_streak += 1;
        } else {
            self.all_pass_streak = 0;
        }

        let pass_limit = self.state.rules().consecutive_pass_limit;
        let max_ticks = self.state.rules().max_ticks;
        if self.all_pass_streak >= pass_limit {
            self.finish(EndReason::AllPassed);
        } else if tick + 1 >= max_ticks {
            self.finish(EndReason::TickLimit);
        } else {
            self.state.tick += 1;
        }

        Some(record)
    }

    /// Play to the end and hand back the result.
    pub fn run(mut self) -> GameResult {
        while self.step().is_some() {}

        let scoring = match self.scoring.take() {
            Some(scoring) => scoring,
            None => score(&self.state),
        };
        GameResult {
            ticks_played: self.state.tick + 1,
            end_reason: self.end_reason.unwrap_or(EndReason::TickLimit),
            scoring,
            state: self.state,
        }
    }

    fn collect(&mut self, tick: u32) -> Vec<(PlayerId, Submission)> {
        let mut submissions = Vec::with_capacity(self.policies.len());
        for (seat, policy) in self.policies.iter_mut().enumerate() {
            let player = PlayerId(seat);
            let view = self.state.view_for(player);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| policy.decide(&view)))
                .unwrap_or_else(|payload| Err(PolicyError::Panicked(panic_message(payload.as_ref()))));

            let submission = match outcome {
                Ok(action) => Submission::Action(action),
                Err(PolicyError::Malformed(err)) => Submission::Malformed(err),
                Err(fault) => {
                    warn!(tick, %player, policy = policy.name(), %fault, "policy fault, passing");
                    if let Some(observer) = self.observer.as_deref_mut() {
                        observer.on_policy_fault(tick, player, &fault);
                    }
                    Submission::Fault(fault.to_string())
                }
            };
            submissions.push((player, submission));
        }
        submissions
    }

    fn resolve(&mut self, tick: u32, player: PlayerId, submission: Submission) -> ResolvedAction {
        let (submitted, fault) = match submission {
            Submission::Action(action) => (action, None),
            Submission::Fault(fault) => (Action::Pass, Some(fault)),
            Submission::Malformed(err) => {
                debug!(tick, %player, reason = %err, "malformed action downgraded to pass");
                return ResolvedAction {
                    player,
                    submitted: Action::Pass,
                    resolved: Action::Pass,
                    valid: false,
                    error: Some(err.to_string()),
                    fault: None,
                };
            }
        };

        let candidate = cross_to_trade(&self.state, player, submitted);

        let error = match validate(&self.state, player, &candidate) {
            Ok(()) => {
                if let Some(trade) = execute(&mut self.state, player, candidate) {
                    info!(
                        tick,
                        suit = %trade.suit,
                        price = trade.price,
                        buyer = %trade.buyer,
                        seller = %trade.seller,
                        "trade"
                    );
                    if let Some(observer) = self.observer.as_deref_mut() {
                        observer.on_trade(&trade);
                    }
                }
                None
            }
            Err(err) => {
                debug!(tick, %player, action = %submitted, reason = %err, "action downgraded to pass");
                Some(err.to_string())
            }
        };

        ResolvedAction {
            player,
            submitted,
            resolved: if error.is_some() { Action::Pass } else { candidate },
            valid: error.is_none(),
            error,
            fault,
        }
    }

    fn finish(&mut self, reason: EndReason) {
        let scoring = score(&self.state);
        self.state.finalize(scoring.scores.clone());

        info!(
            ticks = self.state.tick + 1,
            trades = self.state.trades().len(),
            goal = %scoring.goal_suit,
            ?reason,
            scores = ?scoring.scores,
            "game over"
        );
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_finish(&self.state, &scoring, reason);
        }

        self.end_reason = Some(reason);
        self.scoring = Some(scoring);
    }
}

/// Deal a fresh game and play it to the end.
pub fn run_game(
    state: GameState,
    policies: Vec<Box<dyn Policy>>,
    rng: StdRng,
    observer: Option<&mut dyn GameObserver>,
) -> Result<GameResult, SetupError> {
    let scheduler = TickScheduler::new(state, policies, rng)?;
    Ok(match observer {
        Some(observer) => scheduler.with_observer(observer).run(),
        None => scheduler.run(),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Suit;
    use crate::engine::game_log::GameLog;
    use crate::policy::{policy_fn, ScriptedPolicy, View};
    use crate::rules::GameRules;
    use rand::SeedableRng;

    fn passive(n: usize) -> Vec<Box<dyn Policy>> {
        (0..n)
            .map(|i| Box::new(ScriptedPolicy::new(format!("p{i}"), [])) as Box<dyn Policy>)
            .collect()
    }

    fn dealt(seed: u64) -> GameState {
        GameState::deal(4, GameRules::default(), &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn policy_count_must_match_seats() {
        let result = TickScheduler::new(dealt(1), passive(3), StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(SetupError::SeatMismatch { actual: 3, .. })));
    }

    #[test]
    fn all_pass_game_ends_after_limit() {
        let result = run_game(dealt(1), passive(4), StdRng::seed_from_u64(0), None).unwrap();
        assert_eq!(result.end_reason, EndReason::AllPassed);
        assert_eq!(result.ticks_played, 3);
        assert!(result.state.is_terminal());
        assert_eq!(result.state.final_scores(), Some(result.scores()));
        assert_eq!(result.scores().iter().sum::<Money>(), 0);
    }

    #[test]
    fn tick_ceiling_stops_a_busy_table() {
        let rules = GameRules { max_ticks: 5, ..GameRules::default() };
        let state = GameState::deal(4, rules, &mut StdRng::seed_from_u64(2)).unwrap();
        // The spades bid rises every tick, so some seat always improves it.
        let policies: Vec<Box<dyn Policy>> = (0..4)
            .map(|i| {
                Box::new(policy_fn(format!("bidder{i}"), move |view: &View<'_>| {
                    Ok(Action::Bid {
                        suit: Suit::Spades,
                        price: 1 + view.tick as Money,
                    })
                })) as Box<dyn Policy>
            })
            .collect();
        let result = run_game(state, policies, StdRng::seed_from_u64(0), None).unwrap();
        assert_eq!(result.end_reason, EndReason::TickLimit);
        assert_eq!(result.ticks_played, 5);
    }

    #[test]
    fn faults_become_passes() {
        let policies: Vec<Box<dyn Policy>> = vec![
            Box::new(policy_fn("panics", |_: &View<'_>| -> Result<Action, PolicyError> {
                panic!("boom")
            })),
            Box::new(policy_fn("fails", |_: &View<'_>| {
                Err(PolicyError::Failed("no idea".into()))
            })),
            Box::new(ScriptedPolicy::new("garbage", [serde_json::json!({"type": "offer"})])),
            Box::new(ScriptedPolicy::new("quiet", [])),
        ];
        let mut log = GameLog::new();
        let result = run_game(dealt(4), policies, StdRng::seed_from_u64(9), Some(&mut log)).unwrap();

        assert_eq!(result.end_reason, EndReason::AllPassed);
        let first = log.ticks().next().unwrap();
        let faulted: Vec<_> = first
            .actions
            .iter()
            .filter(|a| a.fault.is_some())
            .map(|a| a.player)
            .collect();
        assert_eq!(faulted.len(), 2);
        assert!(!faulted.contains(&PlayerId(2)));
        assert!(!faulted.contains(&PlayerId(3)));
        assert!(first.actions.iter().all(|a| a.resolved.is_pass()));

        let garbage = first.actions.iter().find(|a| a.player == PlayerId(2)).unwrap();
        assert!(!garbage.valid);
        assert!(garbage.error.as_deref().unwrap().contains("unknown action type"));
    }

    #[test]
    fn observer_sees_setup_ticks_and_finish() {
        let mut log = GameLog::new();
        let result = run_game(dealt(5), passive(4), StdRng::seed_from_u64(5), Some(&mut log)).unwrap();

        assert!(log.is_complete());
        assert_eq!(log.ticks().count() as u32, result.ticks_played);
        let outcome = log.outcome.as_ref().unwrap();
        assert_eq!(outcome.scores, result.scores());
        assert_eq!(outcome.end_reason, EndReason::AllPassed);
        assert_eq!(log.setup.as_ref().unwrap().goal_suit, result.state.goal_suit());
    }

    #[test]
    fn step_after_terminal_is_a_no_op() {
        let mut scheduler =
            TickScheduler::new(dealt(6), passive(4), StdRng::seed_from_u64(1)).unwrap();
        while scheduler.step().is_some() {}
        assert!(scheduler.is_terminal());
        assert!(scheduler.step().is_none());
    }
}
