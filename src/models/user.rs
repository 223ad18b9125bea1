use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an account identity.
///
/// Mutated only through the explicit change operations on the
/// authentication context, each of which re-verifies the current credential
/// before writing.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address, normalized to lowercase.
    pub email: String,
    /// The user's hashed credential.
    pub password_hash: String,
    /// The timestamp when the account was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the account was last updated.
    pub updated_at: DateTime<Utc>,
}
