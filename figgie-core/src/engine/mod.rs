//! Game engine: order book, validation, execution, the tick scheduler and
//! scoring.
//!
//! The scheduler owns the [`GameState`] for the whole game. Only the
//! executor moves cards and money; the validator and scorer are pure.

pub mod executor;
pub mod game_log;
pub mod observer;
pub mod order_book;
pub mod scheduler;
pub mod scoring;
pub mod state;
pub mod validation;

pub use executor::execute;
pub use game_log::{FinalSnapshot, GameLog, LogEvent, SetupSnapshot};
pub use observer::{EndReason, GameObserver, ResolvedAction, TickRecord};
pub use order_book::{OrderBook, Quote, SuitBook};
pub use scheduler::{run_game, GameResult, TickScheduler};
pub use scoring::{score, score_hands, split_remainder, ScoreBreakdown};
pub use state::GameState;
pub use validation::{cross_to_trade, validate, validate_value};
