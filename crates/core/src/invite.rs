//! Human-shareable group invite codes.

use rand::Rng;

use crate::error::CoreError;
use crate::limits::INVITE_CODE_LENGTH;

/// Invite code alphabet. Omits `0`, `O`, `1` and `I`.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random invite code.
///
/// Uniqueness against existing groups is not checked.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| INVITE_CODE_ALPHABET[rng.random_range(0..INVITE_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize user input before looking a code up: trim and upper-case.
pub fn normalize_invite_code(input: &str) -> Result<String, CoreError> {
    let code = input.trim().to_uppercase();
    if code.chars().count() != INVITE_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(CoreError::Validation(format!(
            "Invite code must be {INVITE_CODE_LENGTH} letters or digits"
        )));
    }
    Ok(code)
}
