//! The session store: every live game, behind one lock.
//!
//! # Concurrency
//!
//! A single `tokio::sync::RwLock` guards the whole map. Reads take it
//! shared; everything that mutates the map (create, save, remove, evict)
//! takes it exclusively. Operations on different games still overlap
//! whenever they only read.
//!
//! A turn must not be split across two lock acquisitions: with a separate
//! `get` and `save_or_end`, an eviction landing in between would see the
//! save put the session back, and two guesses on the same game could both
//! read the old state and one would be lost. [`SessionStore::update`] runs
//! the whole read → apply → save-or-end cycle under one write guard, and the
//! game service uses it for every guess.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;
use tokio::time::Instant;
use wordforge_protocol::GameId;
use wordforge_sweep::Sweep;

use crate::{EndReason, Session, SessionConfig, SessionError};

/// What [`SessionStore::save_or_end`] did with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Still in play; stored with a fresh `last_touched`.
    Saved,
    /// Game over; removed from the store.
    Ended(EndReason),
}

/// Shared, in-memory map from [`GameId`] to [`Session`].
///
/// Share it as `Arc<SessionStore>`; every method takes `&self`.
///
/// ```text
/// create() ──→ update()* ──→ [solved | exhausted] ──→ removed
///                 │
///                 └─(idle > ttl)──→ evict() ──→ removed
/// ```
pub struct SessionStore {
    sessions: RwLock<HashMap<GameId, Session>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Inserts a new session keyed by its id.
    ///
    /// Ids are expected to be unique. A collision silently replaces the old
    /// session. A session that is already solved or exhausted is not
    /// stored and comes back as [`SaveOutcome::Ended`].
    pub async fn create(&self, mut session: Session) -> SaveOutcome {
        let game_id = session.id().clone();
        if let Some(reason) = session.end_reason() {
            tracing::warn!(%game_id, ?reason, "new game is already over, not stored");
            return SaveOutcome::Ended(reason);
        }

        session.touch(Instant::now());
        let replaced = self
            .sessions
            .write()
            .await
            .insert(game_id.clone(), session)
            .is_some();

        if replaced {
            tracing::warn!(%game_id, "game id collision, previous session replaced");
        }
        tracing::info!(%game_id, "game created");
        SaveOutcome::Saved
    }

    /// Returns a copy of the live session with this id.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no live session has this id.
    pub async fn get(&self, id: &GameId) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Stores the session, or removes it if the game is over.
    pub async fn save_or_end(&self, session: Session) -> SaveOutcome {
        let mut sessions = self.sessions.write().await;
        Self::save_or_end_locked(&mut sessions, session)
    }

    /// Applies `turn` to the live session with this id and saves or ends
    /// the result, all under one exclusive lock.
    ///
    /// Returns the session as it stands after the turn. If that turn ended
    /// the game, the session is no longer in the store.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no live session has this id; `turn` is
    /// not called.
    pub async fn update<F>(&self, id: &GameId, turn: F) -> Result<Session, SessionError>
    where
        F: FnOnce(Session) -> Session,
    {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        let next = turn(current);
        Self::save_or_end_locked(&mut sessions, next.clone());
        Ok(next)
    }

    /// Removes a session regardless of its state.
    pub async fn remove(&self, id: &GameId) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// Removes every session idle for longer than the configured TTL and
    /// returns their ids.
    pub async fn evict(&self) -> Vec<GameId> {
        let ttl = self.config.ttl;
        let now = Instant::now();
        let mut evicted = Vec::new();

        self.sessions.write().await.retain(|game_id, session| {
            if session.is_idle(now, ttl) {
                evicted.push(game_id.clone());
                false
            } else {
                true
            }
        });

        for game_id in &evicted {
            tracing::info!(%game_id, "game evicted (idle past ttl)");
        }
        evicted
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn save_or_end_locked(
        sessions: &mut HashMap<GameId, Session>,
        mut session: Session,
    ) -> SaveOutcome {
        let game_id = session.id().clone();
        match session.end_reason() {
            Some(reason) => {
                sessions.remove(&game_id);
                tracing::info!(
                    %game_id,
                    ?reason,
                    guesses_remaining = session.guesses_remaining(),
                    "game ended"
                );
                SaveOutcome::Ended(reason)
            }
            None => {
                session.touch(Instant::now());
                sessions.insert(game_id, session);
                SaveOutcome::Saved
            }
        }
    }
}

impl Sweep for SessionStore {
    fn sweep(&self) -> impl Future<Output = usize> + Send {
        async move { self.evict().await.len() }
    }
}

// =========================================================================
// Tests
// =========================================================================
