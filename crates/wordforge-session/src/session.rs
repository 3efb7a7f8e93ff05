//! Session types: the data structures that represent one game.
//!
//! A session tracks:
//! - WHICH game it is (`GameId`)
//! - WHAT the hidden word is, and how much of it the player has found
//! - HOW many wrong guesses the player can still afford
//! - WHEN the store last wrote it (so idle games can be evicted)

use std::time::Duration;

use tokio::time::Instant;
use wordforge_protocol::{GameId, GameSummary};

/// Shown in place of every letter that has not been guessed yet.
pub const PLACEHOLDER: char = '_';

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a session may sit untouched before the sweep evicts it.
    ///
    /// Default: 5 seconds. This is independent of how often the sweep
    /// runs, so an idle session can outlive its TTL by up to one sweep
    /// interval.
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// EndReason
// ---------------------------------------------------------------------------

/// Why a session reached the end of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every letter has been revealed.
    Solved,
    /// No wrong guesses left.
    Exhausted,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One word-guessing game.
///
/// The word and id never change after construction. The revealed letters
/// are only reachable as a fixed-length slice, so they always stay exactly
/// as long as the word, and the guess counter can only go down.
#[derive(Debug, Clone)]
pub struct Session {
    id: GameId,
    word: Vec<char>,
    revealed: Vec<char>,
    guesses_remaining: u32,
    last_touched: Instant,
}

impl Session {
    /// Starts a fresh game: every letter hidden, `guess_limit` guesses.
    pub fn new(id: GameId, word: &str, guess_limit: u32) -> Self {
        let word: Vec<char> = word.chars().collect();
        let revealed = vec![PLACEHOLDER; word.len()];
        Self {
            id,
            word,
            revealed,
            guesses_remaining: guess_limit,
            last_touched: Instant::now(),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// The solution. Never sent to the player.
    pub fn word(&self) -> &[char] {
        &self.word
    }

    pub fn revealed(&self) -> &[char] {
        &self.revealed
    }

    /// Mutable view of the revealed letters, one slot per letter of the word.
    pub fn revealed_mut(&mut self) -> &mut [char] {
        &mut self.revealed
    }

    pub fn guesses_remaining(&self) -> u32 {
        self.guesses_remaining
    }

    /// Spends one guess. Stays at zero once exhausted.
    pub fn charge_guess(&mut self) {
        self.guesses_remaining = self.guesses_remaining.saturating_sub(1);
    }

    pub fn is_solved(&self) -> bool {
        self.revealed == self.word
    }

    pub fn is_exhausted(&self) -> bool {
        self.guesses_remaining == 0
    }

    /// `Some` once the game is over and the session must leave the store.
    pub fn end_reason(&self) -> Option<EndReason> {
        if self.is_solved() {
            Some(EndReason::Solved)
        } else if self.is_exhausted() {
            Some(EndReason::Exhausted)
        } else {
            None
        }
    }

    /// When the store last wrote this session.
    pub fn last_touched(&self) -> Instant {
        self.last_touched
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_touched = now;
    }

    /// `true` if the session has been idle for longer than `ttl` at `now`.
    pub fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) > ttl
    }

    /// The player-visible view of this game.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            current: self.revealed.iter().collect(),
            guesses_remaining: self.guesses_remaining,
        }
    }
}
