//! Session construction and the validation state machine.

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::models::{session::Session, user::User};
use crate::store::AuthStore;
use crate::validation::auth::parse_token;

/// Builds new session records.
///
/// Construction only: persisting the record is the caller's responsibility.
pub struct SessionFactory;

impl SessionFactory {
    /// Creates a session for `user_id` with a fresh random token.
    ///
    /// Non-persistent sessions get the short TTL, persistent ones the long
    /// TTL. The token is a v4 UUID (128 random bits); an unavailable OS
    /// random source aborts the process, which is fatal and non-retryable.
    pub fn create(user_id: Uuid, persistent: bool, config: &Config) -> Session {
        let now = Utc::now();
        let ttl = if persistent {
            config.long_session_ttl
        } else {
            config.short_session_ttl
        };

        Session {
            token: Uuid::new_v4(),
            user_id,
            persistent,
            created_at: now,
            expires_at: now + ttl,
        }
    }
}

/// The outcome of validating a presented token.
///
/// Every failure branch collapses into `Rejected`: an observer cannot tell a
/// malformed token from an unknown or an expired one, which closes the
/// session-enumeration side channel. The branches stay distinct internally
/// because they drive different store operations.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The token resolved to a live session and its owning user.
    Accepted { user: User, session: Session },
    /// The token did not resolve. No cause is exposed.
    Rejected,
}

impl SessionOutcome {
    /// Whether the token resolved to a user.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SessionOutcome::Accepted { .. })
    }
}

/// The session validation state machine.
///
/// Validation is a read-shaped check with documented side effects: expired
/// or orphaned records are deleted eagerly, and a session inside the refresh
/// window has its expiry slid forward and persisted before the call returns.
pub struct SessionValidator<'a> {
    store: &'a dyn AuthStore,
    config: &'a Config,
}

impl<'a> SessionValidator<'a> {
    /// Creates a validator over the given store.
    pub fn new(store: &'a dyn AuthStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Validates a presented token, in order, short-circuiting:
    ///
    /// 1. malformed token → rejected with no store access;
    /// 2. no record → rejected, no mutation;
    /// 3. expired, or owner no longer exists → record deleted, rejected;
    /// 4. inside the refresh window → expiry recomputed (forward only);
    /// 5. a recomputed expiry is persisted before returning;
    /// 6. otherwise accepted with the owning user.
    pub async fn validate(&self, presented: &str) -> Result<SessionOutcome> {
        let Some(token) = parse_token(presented) else {
            tracing::debug!("Session token rejected: malformed");
            return Ok(SessionOutcome::Rejected);
        };

        let Some(mut session) = self.store.get_session(token).await? else {
            tracing::debug!("Session token rejected: no record");
            return Ok(SessionOutcome::Rejected);
        };

        let now = Utc::now();
        if session.is_expired(now) {
            tracing::debug!(user_id = %session.user_id, "Session expired, deleting record");
            self.store.delete_session(token).await?;
            return Ok(SessionOutcome::Rejected);
        }

        let Some(user) = self.store.get_user_by_id(session.user_id).await? else {
            tracing::warn!(user_id = %session.user_id, "Session owner missing, deleting record");
            self.store.delete_session(token).await?;
            return Ok(SessionOutcome::Rejected);
        };

        if session.needs_refresh(now, self.config.refresh_window) {
            let ttl = if session.persistent {
                self.config.long_session_ttl
            } else {
                self.config.short_session_ttl
            };
            let read_expiry = session.expires_at;

            // Expiry only ever moves forward.
            session.expires_at = session.expires_at.max(now + ttl);

            if self.store.update_session(&session, read_expiry).await? {
                tracing::debug!(user_id = %user.id, expires_at = %session.expires_at, "Session refreshed");
            } else {
                // Lost the refresh race: a concurrent validation already
                // extended this session, and its expiry stands.
                tracing::debug!(user_id = %user.id, "Session refresh skipped, concurrent update won");
            }
        }

        Ok(SessionOutcome::Accepted { user, session })
    }
}
