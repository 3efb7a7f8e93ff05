//! # Wordforge
//!
//! Word-guessing game server. Clients start a game, then guess one letter
//! at a time until the word is revealed or their guesses run out.
//!
//! The server keeps every game in an in-memory [`SessionStore`]; finished
//! games are dropped on their last turn and abandoned ones are evicted by a
//! background sweep. Clients talk JSON over WebSocket; see
//! [`wordforge_protocol`] for the message shapes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wordforge::prelude::*;
//!
//! # async fn start() -> Result<(), WordforgeError> {
//! let config = ServerConfig::from_env()?;
//! let words = WordList::from_path(&config.words_path)?;
//! let server = WordforgeServerBuilder::from_config(&config)
//!     .build(words, RandomIdProvider)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::WordforgeError;
pub use server::{WordforgeServer, WordforgeServerBuilder};

pub use wordforge_game::{
    GameConfig, GameError, GameService, IdProvider, IdentifierError, RandomIdProvider, WordList,
    WordListError, WordSource,
};
pub use wordforge_protocol::{
    ClientMessage, Codec, Envelope, GameId, GameSummary, JsonCodec, ServerMessage,
};
pub use wordforge_session::{SessionConfig, SessionStore};
pub use wordforge_sweep::SweepConfig;
pub use wordforge_transport::OriginPolicy;

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{
        ClientMessage, ConfigError, Envelope, GameConfig, GameId, GameSummary, IdProvider,
        OriginPolicy, RandomIdProvider, ServerConfig, ServerMessage, SessionConfig, SweepConfig,
        WordList, WordSource, WordforgeError, WordforgeServer, WordforgeServerBuilder,
    };
}
