//! Unified error type for the Wordforge server.

use wordforge_game::{GameError, WordListError};
use wordforge_protocol::ProtocolError;
use wordforge_transport::TransportError;

use crate::ConfigError;

/// Top-level error wrapping every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum WordforgeError {
    /// Accepting, reading or writing a connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game operation failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The word list could not be loaded.
    #[error(transparent)]
    Words(#[from] WordListError),

    /// The environment held an unusable setting.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
