//! Game state: hands, money, books, and trade history for one round.

use crate::deck::{deal, DeckDistribution};
use crate::domain::{Hand, Money, PlayerId, Suit, Trade};
use crate::engine::order_book::OrderBook;
use crate::policy::View;
use crate::rules::{check_player_count, GameRules, SetupError};
use rand::Rng;

/// Mutable state of one game.
///
/// Fields are private: only the executor moves cards and money, and only the
/// scheduler advances the tick and finalizes scores.
#[derive(Debug, Clone)]
pub struct GameState {
    num_players: usize,
    rules: GameRules,
    distribution: DeckDistribution,
    goal_suit: Suit,
    hands: Vec<Hand>,
    money: Vec<Money>,
    pub(crate) book: OrderBook,
    pub(crate) trades: Vec<Trade>,
    pub(crate) tick: u32,
    terminal: bool,
    final_scores: Option<Vec<Money>>,
}

impl GameState {
    /// Generate a fresh deck, deal it, and take the ante from every player.
    pub fn deal<R: Rng + ?Sized>(
        num_players: usize,
        rules: GameRules,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        check_player_count(num_players)?;
        rules.validate()?;
        let distribution = DeckDistribution::generate(rng);
        let hands = deal(&distribution, num_players, rng)?;
        let money = vec![rules.money_after_ante(num_players)?; num_players];
        Self::from_parts(distribution, hands, money, rules)
    }

    /// Assemble a state from explicit hands and balances.
    ///
    /// Every card of the deck must be in some hand.
    pub fn from_parts(
        distribution: DeckDistribution,
        hands: Vec<Hand>,
        money: Vec<Money>,
        rules: GameRules,
    ) -> Result<Self, SetupError> {
        let num_players = hands.len();
        check_player_count(num_players)?;
        rules.validate()?;
        if money.len() != num_players {
            return Err(SetupError::SeatMismatch {
                players: num_players,
                expected: num_players,
                actual: money.len(),
            });
        }
        for suit in Suit::ALL {
            let held: u32 = hands.iter().map(|h| h[suit]).sum();
            let dealt = distribution.count(suit);
            if held != dealt {
                return Err(SetupError::CardCountMismatch { suit, held, dealt });
            }
        }

        Ok(Self {
            num_players,
            rules,
            goal_suit: distribution.goal_suit(),
            distribution,
            hands,
            money,
            book: OrderBook::new(),
            trades: Vec::new(),
            tick: 0,
            terminal: false,
            final_scores: None,
        })
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn distribution(&self) -> &DeckDistribution {
        &self.distribution
    }

    pub fn goal_suit(&self) -> Suit {
        self.goal_suit
    }

    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn money(&self, player: PlayerId) -> Money {
        self.money[player.index()]
    }

    pub fn balances(&self) -> &[Money] {
        &self.money
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Net scores, set once the game reaches its terminal state.
    pub fn final_scores(&self) -> Option<&[Money]> {
        self.final_scores.as_deref()
    }

    pub fn is_seated(&self, player: PlayerId) -> bool {
        player.index() < self.num_players
    }

    pub fn total_money(&self) -> Money {
        self.money.iter().sum()
    }

    /// Cards of `suit` across all hands.
    pub fn suit_in_hands(&self, suit: Suit) -> u32 {
        self.hands.iter().map(|h| h[suit]).sum()
    }

    /// What `player` is allowed to see at the current tick.
    pub fn view_for(&self, player: PlayerId) -> View<'_> {
        View {
            position: player,
            hand: self.hands[player.index()],
            money: self.money[player.index()],
            books: self.book.books(),
            trades: &self.trades,
            num_players: self.num_players,
            tick: self.tick,
        }
    }

    // ── Mutation (crate-internal) ──────────────────────────────────────

    /// Move one card of `suit` and `price` money between two players.
    pub(crate) fn transfer(&mut self, suit: Suit, price: Money, buyer: PlayerId, seller: PlayerId) {
        debug_assert!(self.hands[seller.index()][suit] > 0, "{seller} has no {suit}");
        self.hands[seller.index()][suit] -= 1;
        self.hands[buyer.index()][suit] += 1;
        self.money[buyer.index()] -= price;
        self.money[seller.index()] += price;
    }

    pub(crate) fn finalize(&mut self, scores: Vec<Money>) {
        debug_assert!(!self.terminal, "game finalized twice");
        self.terminal = true;
        self.final_scores = Some(scores);
    }
}
