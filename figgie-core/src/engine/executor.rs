//! Action execution: applies an already-validated action to the state.
//!
//! Quotes replace the suit's best bid or ask. Trades settle at the resting
//! quote's price, move one card and the money, append a [`Trade`], and then
//! clear every quote in every suit.

use crate::domain::{Action, Money, PlayerId, Suit, Trade};
use crate::engine::order_book::Quote;
use crate::engine::state::GameState;
use tracing::debug;

/// Apply `action` for `player`. Returns the trade if one happened.
///
/// The action must have passed [`validate`](super::validation::validate)
/// against this exact state; nothing is re-checked here.
pub fn execute(state: &mut GameState, player: PlayerId, action: Action) -> Option<Trade> {
    match action {
        Action::Pass => None,
        Action::Bid { suit, price } => {
            state.book.set_bid(suit, Quote { price, owner: player });
            None
        }
        Action::Ask { suit, price } => {
            state.book.set_ask(suit, Quote { price, owner: player });
            None
        }
        Action::Buy { suit } => {
            let ask = state.book.best_ask(suit)?;
            Some(settle(state, suit, ask.price, player, ask.owner))
        }
        Action::Sell { suit } => {
            let bid = state.book.best_bid(suit)?;
            Some(settle(state, suit, bid.price, bid.owner, player))
        }
    }
}

fn settle(
    state: &mut GameState,
    suit: Suit,
    price: Money,
    buyer: PlayerId,
    seller: PlayerId,
) -> Trade {
    state.transfer(suit, price, buyer, seller);

    let trade = Trade {
        suit,
        price,
        buyer,
        seller,
        tick: state.tick,
    };
    state.trades.push(trade);
    state.book.record_last_trade(suit, price);
    state.book.reset_all();

    debug!(tick = trade.tick, %suit, price, %buyer, %seller, "market cleared after trade");
    trade
}
