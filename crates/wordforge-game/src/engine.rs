//! Turn logic: what one guessed letter does to a session.
//!
//! Pure and stateless. The caller validates and upper-cases the guess,
//! and the store decides afterwards whether the game is over.

use wordforge_session::Session;

/// Applies one guessed letter.
///
/// Every position holding `guess` is revealed. If the letter does not occur
/// in the word at all, one guess is charged. A letter that occurs in the
/// word is free even when all its positions were already revealed: the
/// check is membership, not novelty.
pub fn apply(mut session: Session, guess: char) -> Session {
    let mut matched = false;

    for i in 0..session.word().len() {
        if session.word()[i] == guess {
            session.revealed_mut()[i] = guess;
            matched = true;
        }
    }

    if !matched {
        session.charge_guess();
    }

    tracing::debug!(
        game_id = %session.id(),
        %guess,
        matched,
        guesses_remaining = session.guesses_remaining(),
        "turn applied"
    );
    session
}
