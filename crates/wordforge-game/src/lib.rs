//! Word-guessing rules and the game service for Wordforge.
//!
//! # Key types
//!
//! - [`GameService`]: starting a game and guessing a letter
//! - [`engine::apply`]: pure turn logic, no storage
//! - [`WordSource`] / [`WordList`]: where puzzle words come from
//! - [`IdProvider`] / [`RandomIdProvider`]: where game ids come from
//! - [`GameError`]: bad request, not found, or internal

mod error;
mod guess;
mod ident;
mod service;
mod words;

pub mod engine;

pub use error::GameError;
pub use guess::validate_guess;
pub use ident::{IdProvider, IdentifierError, RandomIdProvider};
pub use service::{GameConfig, GameService};
pub use words::{WordList, WordListError, WordSource};
