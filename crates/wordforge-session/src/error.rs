//! Error types for the session layer.

use wordforge_protocol::GameId;

/// Errors raised by the [`SessionStore`](crate::SessionStore).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No live session has this id. It never existed, it already ended,
    /// or it was evicted; the store cannot tell these apart.
    #[error("no game with the id '{0}'")]
    NotFound(GameId),
}
