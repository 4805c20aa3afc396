//! Action validation: a pure check of one action against the current state.
//!
//! Rules per kind:
//! - `pass`: always valid
//! - `bid`: positive, affordable, above the live bid, below the live ask
//! - `ask`: positive, card in hand, below the live ask, above the live bid
//! - `buy`: live ask exists, not own ask, affordable
//! - `sell`: live bid exists, not own bid, card in hand
//!
//! Crossing quotes are refused here; the scheduler turns a crossing quote
//! into a trade before calling the validator.

use crate::domain::{Action, ActionError, PlayerId, Side};
use crate::engine::state::GameState;
use serde_json::Value;

/// Check `action` for `player` against `state`.
pub fn validate(state: &GameState, player: PlayerId, action: &Action) -> Result<(), ActionError> {
    if !state.is_seated(player) {
        return Err(ActionError::Malformed(format!("{player} is not seated")));
    }

    let money = state.money(player);
    let hand = state.hand(player);

    match *action {
        Action::Pass => Ok(()),

        Action::Bid { suit, price } => {
            let book = state.book().book(suit);
            if price <= 0 {
                return Err(ActionError::NonPositivePrice { side: Side::Bid, price });
            }
            if price > money {
                return Err(ActionError::InsufficientFunds { price, money });
            }
            if let Some(best) = book.bid {
                if price <= best.price {
                    return Err(ActionError::NotImproving {
                        side: Side::Bid,
                        price,
                        best: best.price,
                    });
                }
            }
            if let Some(ask) = book.ask {
                if price >= ask.price {
                    return Err(ActionError::CrossesMarket {
                        side: Side::Bid,
                        price,
                        resting: ask.price,
                    });
                }
            }
            Ok(())
        }

        Action::Ask { suit, price } => {
            let book = state.book().book(suit);
            if price <= 0 {
                return Err(ActionError::NonPositivePrice { side: Side::Ask, price });
            }
            if hand[suit] == 0 {
                return Err(ActionError::InsufficientCards { suit });
            }
            if let Some(best) = book.ask {
                if price >= best.price {
                    return Err(ActionError::NotImproving {
                        side: Side::Ask,
                        price,
                        best: best.price,
                    });
                }
            }
            if let Some(bid) = book.bid {
                if price <= bid.price {
                    return Err(ActionError::CrossesMarket {
                        side: Side::Ask,
                        price,
                        resting: bid.price,
                    });
                }
            }
            Ok(())
        }

        Action::Buy { suit } => {
            let ask = state
                .book()
                .best_ask(suit)
                .ok_or(ActionError::NoRestingQuote { side: Side::Ask, suit })?;
            if ask.owner == player {
                return Err(ActionError::SelfTrade { side: Side::Ask });
            }
            if ask.price > money {
                return Err(ActionError::InsufficientFunds { price: ask.price, money });
            }
            Ok(())
        }

        Action::Sell { suit } => {
            let bid = state
                .book()
                .best_bid(suit)
                .ok_or(ActionError::NoRestingQuote { side: Side::Bid, suit })?;
            if bid.owner == player {
                return Err(ActionError::SelfTrade { side: Side::Bid });
            }
            if hand[suit] == 0 {
                return Err(ActionError::InsufficientCards { suit });
            }
            Ok(())
        }
    }
}

/// Parse an untyped action and validate it in one step.
pub fn validate_value(
    state: &GameState,
    player: PlayerId,
    value: &Value,
) -> Result<Action, ActionError> {
    let action = Action::from_value(value)?;
    validate(state, player, &action)?;
    Ok(action)
}

/// Turn a quote that crosses someone else's resting quote into a trade.
///
/// A bid at or above another player's ask becomes a `buy` at the ask; an
/// ask at or below another player's bid becomes a `sell` at the bid. Any
/// other action is returned unchanged, so quotes crossing the player's own
/// resting quote are still refused by [`validate`].
pub fn cross_to_trade(state: &GameState, player: PlayerId, action: Action) -> Action {
    match action {
        Action::Bid { suit, price } if price > 0 => match state.book().best_ask(suit) {
            Some(ask) if ask.owner != player && price >= ask.price => Action::Buy { suit },
            _ => action,
        },
        Action::Ask { suit, price } if price > 0 => match state.book().best_bid(suit) {
            Some(bid) if bid.owner != player && price <= bid.price => Action::Sell { suit },
            _ => action,
        },
        other => other,
    }
}
