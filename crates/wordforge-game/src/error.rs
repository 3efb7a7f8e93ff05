//! Error types for the game layer.

use wordforge_protocol::GameId;
use wordforge_session::SessionError;

use crate::IdentifierError;

/// Errors returned by [`GameService`](crate::GameService).
///
/// Each maps to an HTTP-style status via [`GameError::status_code`].
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Malformed input: missing id, or a guess that is not exactly one
    /// character. Raised before the store is touched.
    #[error("the request is invalid: {0}")]
    BadRequest(String),

    /// No live game with this id: never created, already over, or evicted.
    #[error("the game couldn't be found: no game with the id '{0}'")]
    NotFound(GameId),

    /// Infrastructure failure, currently only id generation.
    #[error("internal error: {0}")]
    Internal(#[from] IdentifierError),
}

impl GameError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    /// 400, 404 or 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

impl From<SessionError> for GameError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => Self::NotFound(id),
        }
    }
}
