//! Player actions and the reasons an action can be refused.

use super::suit::Suit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Signed money amount. Balances may go negative only through scoring.
pub type Money = i64;

/// Which side of a suit's book a quote rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

/// A decision returned by a policy for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Pass,
    /// Post a new best bid.
    Bid { suit: Suit, price: Money },
    /// Post a new best ask.
    Ask { suit: Suit, price: Money },
    /// Lift the resting ask.
    Buy { suit: Suit },
    /// Hit the resting bid.
    Sell { suit: Suit },
}

impl Action {
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }

    pub fn suit(&self) -> Option<Suit> {
        match *self {
            Action::Pass => None,
            Action::Bid { suit, .. }
            | Action::Ask { suit, .. }
            | Action::Buy { suit }
            | Action::Sell { suit } => Some(suit),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Pass => "pass",
            Action::Bid { .. } => "bid",
            Action::Ask { .. } => "ask",
            Action::Buy { .. } => "buy",
            Action::Sell { .. } => "sell",
        }
    }

    /// Parse an untyped action such as `{"type": "bid", "suit": "clubs", "price": 7}`.
    ///
    /// Unlike serde deserialization this reports which part of the shape is
    /// wrong, so the reason can be logged next to the downgraded action.
    pub fn from_value(value: &Value) -> Result<Action, ActionError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ActionError::Malformed("action must be an object".into()))?;

        let kind = match obj.get("type") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => return Err(ActionError::UnknownKind(other.to_string())),
            None => return Err(ActionError::Malformed("missing action type".into())),
        };

        if kind == "pass" {
            return Ok(Action::Pass);
        }
        if !matches!(kind, "bid" | "ask" | "buy" | "sell") {
            return Err(ActionError::UnknownKind(kind.to_string()));
        }

        let suit = match obj.get("suit") {
            Some(Value::String(name)) => name
                .parse::<Suit>()
                .map_err(|_| ActionError::InvalidSuit(name.clone()))?,
            Some(other) => return Err(ActionError::InvalidSuit(other.to_string())),
            None => return Err(ActionError::Malformed(format!("{kind} requires a suit"))),
        };

        let price = || match obj.get("price") {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ActionError::Malformed(format!("price must be an integer, got {n}"))),
            Some(other) => Err(ActionError::Malformed(format!(
                "price must be an integer, got {other}"
            ))),
            None => Err(ActionError::Malformed(format!("{kind} requires a price"))),
        };

        Ok(match kind {
            "bid" => Action::Bid { suit, price: price()? },
            "ask" => Action::Ask { suit, price: price()? },
            "buy" => Action::Buy { suit },
            _ => Action::Sell { suit },
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pass => f.write_str("pass"),
            Action::Bid { suit, price } => write!(f, "bid {suit} @ {price}"),
            Action::Ask { suit, price } => write!(f, "ask {suit} @ {price}"),
            Action::Buy { suit } => write!(f, "buy {suit}"),
            Action::Sell { suit } => write!(f, "sell {suit}"),
        }
    }
}

/// Why an action was refused. Refused actions are downgraded to `pass`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("malformed action: {0}")]
    Malformed(String),

    #[error("unknown action type {0}, must be one of pass, bid, ask, buy, sell")]
    UnknownKind(String),

    #[error("invalid suit: {0}")]
    InvalidSuit(String),

    #[error("{side} price must be a positive integer, got {price}")]
    NonPositivePrice { side: Side, price: Money },

    #[error("cannot pay {price}, only have {money}")]
    InsufficientFunds { price: Money, money: Money },

    #[error("{side} of {price} does not improve on the current best {side} of {best}")]
    NotImproving { side: Side, price: Money, best: Money },

    #[error("{side} of {price} would cross the resting {} at {resting}, trade instead", opposite(.side))]
    CrossesMarket { side: Side, price: Money, resting: Money },

    #[error("cannot trade against your own {side}")]
    SelfTrade { side: Side },

    #[error("no resting {side} for {suit}")]
    NoRestingQuote { side: Side, suit: Suit },

    #[error("no {suit} in hand")]
    InsufficientCards { suit: Suit },
}

fn opposite(side: &Side) -> Side {
    match side {
        Side::Bid => Side::Ask,
        Side::Ask => Side::Bid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_kind() {
        assert_eq!(Action::from_value(&json!({"type": "pass"})).unwrap(), Action::Pass);
        assert_eq!(
            Action::from_value(&json!({"type": "bid", "suit": "hearts", "price": 6})).unwrap(),
            Action::Bid { suit: Suit::Hearts, price: 6 }
        );
        assert_eq!(
            Action::from_value(&json!({"type": "ask", "suit": "clubs", "price": 9})).unwrap(),
            Action::Ask { suit: Suit::Clubs, price: 9 }
        );
        assert_eq!(
            Action::from_value(&json!({"type": "buy", "suit": "spades"})).unwrap(),
            Action::Buy { suit: Suit::Spades }
        );
        assert_eq!(
            Action::from_value(&json!({"type": "sell", "suit": "diamonds"})).unwrap(),
            Action::Sell { suit: Suit::Diamonds }
        );
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            Action::from_value(&json!("bid")),
            Err(ActionError::Malformed(_))
        ));
        assert!(matches!(
            Action::from_value(&json!({"suit": "hearts"})),
            Err(ActionError::Malformed(_))
        ));
        assert!(matches!(
            Action::from_value(&json!({"type": "offer", "suit": "hearts", "price": 3})),
            Err(ActionError::UnknownKind(_))
        ));
        assert!(matches!(
            Action::from_value(&json!({"type": "buy", "suit": "stars"})),
            Err(ActionError::InvalidSuit(_))
        ));
        assert!(matches!(
            Action::from_value(&json!({"type": "bid", "suit": "hearts", "price": 2.5})),
            Err(ActionError::Malformed(_))
        ));
        assert!(matches!(
            Action::from_value(&json!({"type": "ask", "suit": "hearts"})),
            Err(ActionError::Malformed(_))
        ));
    }

    #[test]
    fn negative_price_parses_and_is_left_to_validation() {
        assert_eq!(
            Action::from_value(&json!({"type": "bid", "suit": "hearts", "price": -4})).unwrap(),
            Action::Bid { suit: Suit::Hearts, price: -4 }
        );
    }

    #[test]
    fn serde_shape_matches_wire_format() {
        let json = serde_json::to_value(Action::Bid { suit: Suit::Clubs, price: 4 }).unwrap();
        assert_eq!(json, json!({"type": "bid", "suit": "clubs", "price": 4}));
        let json = serde_json::to_value(Action::Pass).unwrap();
        assert_eq!(json, json!({"type": "pass"}));
    }

    #[test]
    fn crossing_reason_names_the_resting_side() {
        let err = ActionError::CrossesMarket { side: Side::Bid, price: 9, resting: 8 };
        assert!(err.to_string().contains("resting ask at 8"));
    }
}
