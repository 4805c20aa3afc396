use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat index of a player at the table (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }

    /// All seats for a table of `num_players`, in ascending order.
    pub fn all(num_players: usize) -> impl Iterator<Item = PlayerId> {
        (0..num_players).map(PlayerId)
    }
}

impl From<usize> for PlayerId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
