//! Wire protocol for Wordforge.
//!
//! - **Types** ([`Envelope`], [`ClientMessage`], [`ServerMessage`],
//!   [`GameSummary`], [`GameId`]): what travels between client and server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages become
//!   bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frames) → Protocol (Envelope) → Game service (sessions)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, Envelope, GameId, GameSummary, ServerMessage};
