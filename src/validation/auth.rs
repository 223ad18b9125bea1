use uuid::Uuid;

use crate::error::{AuthError, Result};

/// Validates the shape of an email address.
///
/// Syntax rules beyond a basic shape check are out of scope here; the store
/// is the authority on which addresses exist.
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() < 3 || email.len() > 255 {
        return Err(AuthError::Validation(
            "Email must be between 3 and 255 characters".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::Validation(
            "Email must contain an '@'".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(AuthError::Validation(
            "Email must have a local part and a domain".to_string(),
        ));
    }

    Ok(())
}

/// Validates the shape of a password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AuthError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AuthError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parses a presented session token if it has the expected shape: the
/// 36-character hyphenated form of a UUID.
///
/// Anything else is rejected here, before any store access, so malformed
/// input costs no I/O and produces no timing signal from the store.
pub fn parse_token(token: &str) -> Option<Uuid> {
    if token.len() != 36 {
        return None;
    }
    Uuid::parse_str(token).ok()
}
