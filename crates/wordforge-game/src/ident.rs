//! Game id generation.

use rand::rngs::OsRng;
use rand::TryRngCore;
use wordforge_protocol::GameId;

/// Mints unique game ids.
pub trait IdProvider: Send + Sync + 'static {
    /// Returns a fresh id, unique with overwhelming probability for the
    /// life of the process.
    ///
    /// # Errors
    /// [`IdentifierError`] if no id could be produced. Not retried.
    fn new_identifier(&self) -> Result<GameId, IdentifierError>;
}

/// Id generation failed.
#[derive(Debug, thiserror::Error)]
#[error("generate game id: {0}")]
pub struct IdentifierError(String);

impl IdentifierError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// 128 random bits from the operating system, as 32 lowercase hex chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdProvider;

impl IdProvider for RandomIdProvider {
    fn new_identifier(&self) -> Result<GameId, IdentifierError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| IdentifierError::new(e.to_string()))?;
        Ok(GameId::new(
            bytes.iter().map(|b| format!("{b:02x}")).collect::<String>(),
        ))
    }
}
