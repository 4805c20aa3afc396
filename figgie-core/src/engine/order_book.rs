//! Order book: best bid and best ask per suit, no depth.
//!
//! Each suit holds at most one live bid and one live ask. A new quote
//! replaces the previous one outright. The book never checks legality: the
//! validator decides what reaches it, and the executor clears every suit
//! after each trade. The book only tracks quote state.

use crate::domain::{Money, PlayerId, Side, Suit, SuitMap};
use serde::{Deserialize, Serialize};

/// A live quote: a positive price owned by one player.
///
/// An empty side of the book is `None`, never a zero-price quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub price: Money,
    pub owner: PlayerId,
}

/// Best-of-book state for one suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuitBook {
    pub bid: Option<Quote>,
    pub ask: Option<Quote>,
    /// Price of the most recent trade in this suit. Survives quote resets.
    pub last_trade: Option<Money>,
}

impl SuitBook {
    pub fn quote(&self, side: Side) -> Option<Quote> {
        match side {
            Side::Bid => self.bid,
            Side::Ask => self.ask,
        }
    }

    /// Bid at or above ask. Must never persist between actions.
    pub fn is_crossed(&self) -> bool {
        matches!((self.bid, self.ask), (Some(bid), Some(ask)) if bid.price >= ask.price)
    }

    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none()
    }
}

/// One [`SuitBook`] per suit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBook {
    books: SuitMap<SuitBook>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn book(&self, suit: Suit) -> &SuitBook {
        &self.books[suit]
    }

    pub fn books(&self) -> &SuitMap<SuitBook> {
        &self.books
    }

    pub fn best_bid(&self, suit: Suit) -> Option<Quote> {
        self.books[suit].bid
    }

    pub fn best_ask(&self, suit: Suit) -> Option<Quote> {
        self.books[suit].ask
    }

    /// True when no suit has a live quote.
    pub fn is_clear(&self) -> bool {
        self.books.values().all(SuitBook::is_empty)
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Replace the suit's best bid.
    pub fn set_bid(&mut self, suit: Suit, quote: Quote) {
        self.books[suit].bid = Some(quote);
        debug_assert!(!self.books[suit].is_crossed(), "bid crossed the {suit} book");
    }

    /// Replace the suit's best ask.
    pub fn set_ask(&mut self, suit: Suit, quote: Quote) {
        self.books[suit].ask = Some(quote);
        debug_assert!(!self.books[suit].is_crossed(), "ask crossed the {suit} book");
    }

    /// Invalidate both quotes for one suit.
    pub fn reset(&mut self, suit: Suit) {
        let book = &mut self.books[suit];
        book.bid = None;
        book.ask = None;
    }

    /// Invalidate every quote in every suit.
    pub fn reset_all(&mut self) {
        for suit in Suit::ALL {
            self.reset(suit);
        }
    }

    pub fn record_last_trade(&mut self, suit: Suit, price: Money) {
        self.books[suit].last_trade = Some(price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price: Money, owner: usize) -> Quote {
        Quote { price, owner: PlayerId(owner) }
    }

    #[test]
    fn new_book_is_clear() {
        let book = OrderBook::new();
        assert!(book.is_clear());
        for suit in Suit::ALL {
            assert_eq!(book.best_bid(suit), None);
            assert_eq!(book.best_ask(suit), None);
            assert_eq!(book.book(suit).last_trade, None);
        }
    }

    #[test]
    fn set_replaces_previous_quote() {
        let mut book = OrderBook::new();
        book.set_bid(Suit::Clubs, quote(3, 0));
        book.set_bid(Suit::Clubs, quote(5, 1));
        assert_eq!(book.best_bid(Suit::Clubs), Some(quote(5, 1)));

        book.set_ask(Suit::Clubs, quote(9, 2));
        book.set_ask(Suit::Clubs, quote(7, 3));
        assert_eq!(book.best_ask(Suit::Clubs), Some(quote(7, 3)));
        assert!(!book.book(Suit::Clubs).is_crossed());
    }

    #[test]
    fn reset_touches_one_suit_only() {
        let mut book = OrderBook::new();
        book.set_bid(Suit::Hearts, quote(4, 0));
        book.set_ask(Suit::Spades, quote(8, 1));
        book.reset(Suit::Hearts);
        assert_eq!(book.best_bid(Suit::Hearts), None);
        assert_eq!(book.best_ask(Suit::Spades), Some(quote(8, 1)));
    }

    #[test]
    fn reset_all_keeps_last_trade() {
        let mut book = OrderBook::new();
        book.set_bid(Suit::Hearts, quote(4, 0));
        book.set_ask(Suit::Diamonds, quote(8, 1));
        book.record_last_trade(Suit::Hearts, 6);
        book.reset_all();
        assert!(book.is_clear());
        assert_eq!(book.book(Suit::Hearts).last_trade, Some(6));
    }

    #[test]
    fn view_shape_uses_null_for_empty_sides() {
        let mut book = OrderBook::new();
        book.set_bid(Suit::Spades, quote(2, 3));
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["spades"]["bid"]["price"], 2);
        assert_eq!(json["spades"]["bid"]["owner"], 3);
        assert!(json["spades"]["ask"].is_null());
        assert!(json["clubs"]["last_trade"].is_null());
    }
}
