//! The game service: the two operations clients can perform.

use std::sync::Arc;

use wordforge_protocol::{GameId, GameSummary};
use wordforge_session::{Session, SessionStore};

use crate::{engine, validate_guess, GameError, IdProvider, WordSource};

/// Rules that apply to every new game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Wrong guesses allowed before the game is lost. Default: 6.
    pub guess_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { guess_limit: 6 }
    }
}

impl GameConfig {
    /// Clamps `guess_limit` up to 1; a game with no guesses is over before
    /// it starts.
    ///
    /// Called automatically by [`GameService::with_config`].
    pub fn validated(mut self) -> Self {
        if self.guess_limit == 0 {
            tracing::warn!("guess limit of 0, clamping to 1");
            self.guess_limit = 1;
        }
        self
    }
}

/// Starts games and applies guesses.
///
/// Owns its collaborators; the store is shared so the server can sweep it.
pub struct GameService<W: WordSource, I: IdProvider> {
    store: Arc<SessionStore>,
    words: W,
    ids: I,
    config: GameConfig,
}

impl<W: WordSource, I: IdProvider> GameService<W, I> {
    pub fn new(store: Arc<SessionStore>, words: W, ids: I) -> Self {
        Self {
            store,
            words,
            ids,
            config: GameConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config.validated();
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Starts a game with a random word and returns its opening summary.
    ///
    /// # Errors
    /// [`GameError::Internal`] if no id could be minted.
    pub async fn new_game(&self) -> Result<GameSummary, GameError> {
        let id = self.ids.new_identifier()?;
        let word = self.words.pick_random_word();

        let session = Session::new(id, &word, self.config.guess_limit);
        let summary = session.summary();
        self.store.create(session).await;

        Ok(summary)
    }

    /// Applies one guess to a live game.
    ///
    /// The summary reflects the state after the guess, including the final
    /// state of a game this guess just won or lost. Such a game is gone
    /// from the store, so the next guess on it is [`GameError::NotFound`].
    ///
    /// # Errors
    /// - [`GameError::BadRequest`]: empty id, or not exactly one character
    /// - [`GameError::NotFound`]: no live game with this id
    pub async fn guess(&self, id: &GameId, guess: &str) -> Result<GameSummary, GameError> {
        let letter = validate_guess(id, guess)?;
        let session = self
            .store
            .update(id, |session| engine::apply(session, letter))
            .await?;
        Ok(session.summary())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use wordforge_session::SessionConfig;

    use super::*;
    use crate::IdentifierError;

    struct FixedWord(&'static str);

    impl WordSource for FixedWord {
        fn pick_random_word(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Default)]
    struct SequentialIds(AtomicU64);

    impl IdProvider for SequentialIds {
        fn new_identifier(&self) -> Result<GameId, IdentifierError> {
            let n = self.0.fetch_add(1, Ordering::Relaxed);
            Ok(GameId::new(format!("game-{n}")))
        }
    }

    struct BrokenIds;

    impl IdProvider for BrokenIds {
        fn new_identifier(&self) -> Result<GameId, IdentifierError> {
            Err(IdentifierError::new("entropy source unavailable"))
        }
    }

    fn service(word: &'static str) -> GameService<FixedWord, SequentialIds> {
        let store = Arc::new(SessionStore::new(SessionConfig::default()));
        GameService::new(store, FixedWord(word), SequentialIds::default())
    }

    #[tokio::test]
    async fn test_new_game_hides_word_and_stores_session() {
        let svc = service("TEST");
        let summary = svc.new_game().await.unwrap();

        assert_eq!(summary.id, GameId::new("game-0"));
        assert_eq!(summary.current, "____");
        assert_eq!(summary.guesses_remaining, 6);
        assert!(svc.store().get(&summary.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_game_uses_configured_guess_limit() {
        let svc = service("TEST").with_config(GameConfig { guess_limit: 3 });
        assert_eq!(svc.new_game().await.unwrap().guesses_remaining, 3);
    }

    #[test]
    fn test_validated_clamps_zero_guess_limit() {
        assert_eq!(GameConfig { guess_limit: 0 }.validated().guess_limit, 1);
        assert_eq!(GameConfig { guess_limit: 4 }.validated().guess_limit, 4);
    }

    #[tokio::test]
    async fn test_zero_guess_limit_still_starts_a_live_game() {
        let svc = service("TEST").with_config(GameConfig { guess_limit: 0 });
        let summary = svc.new_game().await.unwrap();
        assert_eq!(summary.guesses_remaining, 1);

        let session = svc.store().get(&summary.id).await.unwrap();
        assert_eq!(session.end_reason(), None);

        // One wrong guess ends it.
        assert_eq!(svc.guess(&summary.id, "Z").await.unwrap().guesses_remaining, 0);
        assert!(svc.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_new_game_id_failure_is_internal_and_stores_nothing() {
        let store = Arc::new(SessionStore::new(SessionConfig::default()));
        let svc = GameService::new(Arc::clone(&store), FixedWord("TEST"), BrokenIds);

        let err = svc.new_game().await.unwrap_err();
        assert!(matches!(err, GameError::Internal(_)));
        assert_eq!(err.status_code(), 500);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_guess_lowercase_is_folded() {
        let svc = service("TEST");
        let id = svc.new_game().await.unwrap().id;

        let summary = svc.guess(&id, "t").await.unwrap();
        assert_eq!(summary.current, "T__T");
        assert_eq!(summary.guesses_remaining, 6);
    }

    #[tokio::test]
    async fn test_non_ascii_letter_is_a_miss() {
        let svc = service("TEST");
        let id = svc.new_game().await.unwrap().id;

        let summary = svc.guess(&id, "é").await.unwrap();
        assert_eq!(summary.current, "____");
        assert_eq!(summary.guesses_remaining, 5);
    }

    #[tokio::test]
    async fn test_bad_request_never_touches_store() {
        let svc = service("TEST");
        let id = svc.new_game().await.unwrap().id;

        assert!(matches!(
            svc.guess(&id, "EE").await,
            Err(GameError::BadRequest(_))
        ));
        let session = svc.store().get(&id).await.unwrap();
        assert_eq!(session.guesses_remaining(), 6);
    }
}
