//! Game session storage for Wordforge.
//!
//! - [`Session`]: one game in progress, holding the hidden word, what has been
//!   revealed, and how many wrong guesses are left.
//! - [`SessionStore`]: the shared map of live sessions. Finished games are
//!   removed as soon as their last turn is saved; abandoned ones are evicted
//!   once they sit idle longer than [`SessionConfig::ttl`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Game service (above)  ← mints ids, picks words, applies turns
//!     ↕
//! Session store (this crate)  ← owns every live session
//!     ↕
//! Protocol (below)  ← provides GameId, GameSummary
//! ```

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{EndReason, Session, SessionConfig, PLACEHOLDER};
pub use store::{SaveOutcome, SessionStore};
