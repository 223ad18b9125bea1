use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{session::Session, user::User};
use crate::store::AuthStore;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    sessions: HashMap<Uuid, Session>,
}

/// An in-process `AuthStore` over hash maps behind a `tokio` lock.
///
/// Every trait method holds the lock for its whole body, so the
/// compare-and-set in `update_session` is atomic with respect to concurrent
/// validations of the same token.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.inner.read().await.emails.contains_key(email))
    }

    async fn add_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.emails.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(previous) = inner.users.insert(user.id, user.clone()) {
            if previous.email != user.email {
                inner.emails.remove(&previous.email);
            }
        }
        inner.emails.insert(user.email.clone(), user.id);
        Ok(())
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(&token).cloned())
    }

    async fn add_session(&self, session: &Session) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.token, session.clone());
        Ok(())
    }

    async fn update_session(
        &self,
        session: &Session,
        expected_expiry: DateTime<Utc>,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.sessions.get_mut(&session.token) {
            Some(stored) if stored.expires_at == expected_expiry => {
                *stored = session.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_session(&self, token: Uuid) -> Result<()> {
        self.inner.write().await.sessions.remove(&token);
        Ok(())
    }
}
