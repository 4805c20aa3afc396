//! Domain types for the Figgie engine

pub mod action;
pub mod ids;
pub mod suit;
pub mod trade;

pub use action::{Action, ActionError, Money, Side};
pub use ids::PlayerId;
pub use suit::{Color, Hand, Suit, SuitMap, UnknownSuit};
pub use trade::Trade;
