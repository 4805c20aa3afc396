//! Suits, colors, and the fixed per-suit table used for hands and books.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

/// One of the four card categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

/// Color class of a suit. Each color holds exactly two suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown suit '{0}'")]
pub struct UnknownSuit(pub String);

impl Suit {
    /// Canonical suit order. Indexes into [`SuitMap`] follow it.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds];

    pub fn color(self) -> Color {
        match self {
            Suit::Spades | Suit::Clubs => Color::Black,
            Suit::Hearts | Suit::Diamonds => Color::Red,
        }
    }

    /// The other suit of the same color.
    pub fn same_color_partner(self) -> Suit {
        match self {
            Suit::Spades => Suit::Clubs,
            Suit::Clubs => Suit::Spades,
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Clubs => "clubs",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suit {
    type Err = UnknownSuit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.as_str() == s)
            .ok_or_else(|| UnknownSuit(s.to_string()))
    }
}

/// A value per suit, stored inline and indexed by [`Suit`].
///
/// Serializes as a `{suit: value}` map so views and logs read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuitMap<T>([T; 4]);

/// Card counts per suit held by one player.
pub type Hand = SuitMap<u32>;

impl<T> SuitMap<T> {
    pub fn from_fn(mut f: impl FnMut(Suit) -> T) -> Self {
        Self(Suit::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suit, &T)> {
        Suit::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl SuitMap<u32> {
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl<T> Index<Suit> for SuitMap<T> {
    type Output = T;

    fn index(&self, suit: Suit) -> &T {
        &self.0[suit.index()]
    }
}

impl<T> IndexMut<Suit> for SuitMap<T> {
    fn index_mut(&mut self, suit: Suit) -> &mut T {
        &mut self.0[suit.index()]
    }
}

impl<T: Serialize> Serialize for SuitMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for SuitMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Suit, T>::deserialize(deserializer)?;
        let mut map = SuitMap::<T>::default();
        for (suit, value) in entries {
            map[suit] = value;
        }
        Ok(map)
    }
}
