use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents one authenticated device or browser instance.
///
/// The token is the only thing the client ever holds; everything else lives
/// in the store. A session must reference an existing user at validation
/// time or it is deleted on the spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The opaque token identifying this session to the client.
    pub token: Uuid,
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// Whether this is a long-lived ("remember me") session.
    pub persistent: bool,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has outlived its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether `now` falls inside the sliding-expiration window before
    /// expiry. Derived at validation time, never stored.
    pub fn needs_refresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        !self.is_expired(now) && self.expires_at - now <= window
    }
}
