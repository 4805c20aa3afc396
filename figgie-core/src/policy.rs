//! Policy contract: what a player sees each tick and how it answers.
//!
//! A policy receives a [`View`] built from the state at the start of the
//! tick and returns one [`Action`]. Policies are untrusted: an `Err`, a
//! malformed action, or a panic inside `decide` is replaced with `pass` by
//! the scheduler and the game carries on.

use crate::domain::{Action, ActionError, Hand, Money, PlayerId, SuitMap, Trade};
use crate::engine::order_book::SuitBook;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use thiserror::Error;

/// Per-player snapshot published each tick.
///
/// Never contains the goal suit or the deck distribution.
#[derive(Debug, Clone, Serialize)]
pub struct View<'a> {
    pub position: PlayerId,
    pub hand: Hand,
    pub money: Money,
    pub books: &'a SuitMap<SuitBook>,
    pub trades: &'a [Trade],
    pub num_players: usize,
    pub tick: u32,
}

/// A policy failed to produce an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("{0}")]
    Malformed(#[from] ActionError),

    #[error("policy failed: {0}")]
    Failed(String),

    #[error("policy panicked: {0}")]
    Panicked(String),
}

/// A trading decision function.
pub trait Policy: Send {
    /// Name used in logs and results.
    fn name(&self) -> &str;

    fn decide(&mut self, view: &View<'_>) -> Result<Action, PolicyError>;
}

/// Replays a fixed queue of untyped actions, then passes forever.
///
/// Each entry goes through [`Action::from_value`], so a script can carry
/// malformed actions on purpose.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    name: String,
    script: VecDeque<Value>,
}

impl ScriptedPolicy {
    pub fn new(name: impl Into<String>, script: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            script: script.into_iter().collect(),
        }
    }

    /// Script made of already-typed actions.
    pub fn from_actions(name: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(
            name,
            actions
                .into_iter()
                .map(|a| serde_json::to_value(a).unwrap_or(Value::Null)),
        )
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, _view: &View<'_>) -> Result<Action, PolicyError> {
        match self.script.pop_front() {
            Some(value) => Ok(Action::from_value(&value)?),
            None => Ok(Action::Pass),
        }
    }
}

/// Adapts a closure into a [`Policy`].
pub struct FnPolicy<F> {
    name: String,
    decide: F,
}

pub fn policy_fn<F>(name: impl Into<String>, decide: F) -> FnPolicy<F>
where
    F: FnMut(&View<'_>) -> Result<Action, PolicyError> + Send,
{
    FnPolicy {
        name: name.into(),
        decide,
    }
}

impl<F> Policy for FnPolicy<F>
where
    F: FnMut(&View<'_>) -> Result<Action, PolicyError> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, view: &View<'_>) -> Result<Action, PolicyError> {
        (self.decide)(view)
    }
}
