//! Storage capability consumed by the authentication core.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{session::Session, user::User};

/// Durable storage for user and session records.
///
/// The core treats the store as an opaque capability and never caches
/// records across calls: every validation re-reads ground truth. Email
/// lookups are exact-match; callers pass normalized addresses.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Finds a user by their normalized email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Finds a user by their ID.
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Whether an account with this normalized email already exists.
    async fn user_exists_by_email(&self, email: &str) -> Result<bool>;

    /// Persists a new user record.
    async fn add_user(&self, user: &User) -> Result<()>;

    /// Rewrites an existing user record.
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Finds a session by its token.
    async fn get_session(&self, token: Uuid) -> Result<Option<Session>>;

    /// Persists a new session record.
    async fn add_session(&self, session: &Session) -> Result<()>;

    /// Writes `session` only if the stored expiry still equals
    /// `expected_expiry`, and reports whether the write applied.
    ///
    /// This compare-and-set keeps two concurrent refreshes of the same token
    /// from persisting divergent expiries: the loser observes `false` and
    /// the winner's (later) expiry stands.
    async fn update_session(
        &self,
        session: &Session,
        expected_expiry: DateTime<Utc>,
    ) -> Result<bool>;

    /// Removes a session record. Removing an absent token is a no-op.
    async fn delete_session(&self, token: Uuid) -> Result<()>;
}
