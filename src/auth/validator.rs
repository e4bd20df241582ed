//! Authentication validator
//!
//! Answers the single question PASS needs: does this password match the
//! stored credential for the most recently announced user?

use super::credentials::Credentials;
use crate::error::AuthError;

/// Validates that the provided password matches the stored password for the username.
pub fn validate_password(
    credentials: &Credentials,
    username: Option<&str>,
    password: &str,
) -> Result<(), AuthError> {
    let username = username.ok_or(AuthError::MissingUsername)?;

    match credentials.expected_password(username) {
        Some(stored) if stored == password => Ok(()),
        Some(_) => Err(AuthError::InvalidPassword(username.to_string())),
        None => Err(AuthError::UserNotFound(username.to_string())),
    }
}
