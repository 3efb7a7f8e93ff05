//! Input validation for a guess request.

use wordforge_protocol::GameId;

use crate::GameError;

/// Checks a guess request and returns the guessed letter, upper-cased.
///
/// Length is counted in characters, not bytes: `"é"` is one character and
/// passes as `'É'`. Word lists only hold `A`–`Z`, so such a letter never
/// matches and costs a guess like any other miss.
///
/// # Errors
/// [`GameError::BadRequest`] if `id` is empty or `guess` is not exactly
/// one character.
pub fn validate_guess(id: &GameId, guess: &str) -> Result<char, GameError> {
    if id.is_empty() {
        return Err(GameError::bad_request("id is missing"));
    }

    let mut chars = guess.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return Err(GameError::bad_request(
            "guess can only be 1 (one) character",
        ));
    };

    Ok(fold_upper(letter))
}

/// Upper-case mapping that stays one character. Letters whose upper case
/// expands (`ß` → `SS`) are kept as they are.
fn fold_upper(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => letter,
    }
}
