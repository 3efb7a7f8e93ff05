//! Puzzle words.
//!
//! The service only needs "give me a random word" ([`WordSource`]). The
//! stock implementation, [`WordList`], reads a dictionary with one word per
//! line and keeps the entries made purely of the letters `A`–`Z`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::Rng;

/// Supplies puzzle words.
pub trait WordSource: Send + Sync + 'static {
    /// Returns one word, chosen uniformly at random.
    fn pick_random_word(&self) -> String;
}

/// Errors raised while building a [`WordList`].
#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("read words: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing in the input was usable as a puzzle word.
    #[error("word list is empty")]
    Empty,
}

/// An in-memory list of eligible words. Never empty.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from candidate words, normalising and filtering them.
    ///
    /// # Errors
    /// [`WordListError::Empty`] if no candidate survives the filter.
    pub fn new<S: AsRef<str>>(candidates: impl IntoIterator<Item = S>) -> Result<Self, WordListError> {
        let words: Vec<String> = candidates
            .into_iter()
            .filter_map(|candidate| normalize(candidate.as_ref()))
            .collect();

        if words.is_empty() {
            return Err(WordListError::Empty);
        }
        tracing::debug!(count = words.len(), "word list loaded");
        Ok(Self { words })
    }

    /// Reads one candidate per line.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, WordListError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::new(lines)
    }

    /// Reads a dictionary file, one candidate per line.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl WordSource for WordList {
    fn pick_random_word(&self) -> String {
        let index = rand::rng().random_range(0..self.words.len());
        self.words[index].clone()
    }
}

/// Trims and upper-cases a candidate; `None` unless it is all `A`–`Z`.
fn normalize(candidate: &str) -> Option<String> {
    let word = candidate.trim().to_uppercase();
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_uppercase()) {
        Some(word)
    } else {
        None
    }
}
