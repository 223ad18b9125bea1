#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gatehouse::error::Result;
use gatehouse::models::{session::Session, user::User};
use gatehouse::services::credential;
use gatehouse::store::{AuthStore, memory::MemoryStore};
use gatehouse::transport::TokenCarrier;

/// A `TokenCarrier` that records every issue/revoke instead of touching any
/// real transport.
#[derive(Default)]
pub struct RecordingCarrier {
    pub issued: Mutex<Vec<(Uuid, DateTime<Utc>)>>,
    pub revoked: AtomicUsize,
}

impl RecordingCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued_count(&self) -> usize {
        self.issued.lock().unwrap().len()
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.load(Ordering::SeqCst)
    }
}

impl TokenCarrier for RecordingCarrier {
    fn issue(&self, token: Uuid, expires_at: DateTime<Utc>) {
        self.issued.lock().unwrap().push((token, expires_at));
    }

    fn revoke(&self) {
        self.revoked.fetch_add(1, Ordering::SeqCst);
    }
}

/// A `MemoryStore` wrapper that counts calls per operation.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub user_lookups: AtomicUsize,
    pub user_adds: AtomicUsize,
    pub session_reads: AtomicUsize,
    pub session_adds: AtomicUsize,
    pub session_updates: AtomicUsize,
    pub session_deletes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthStore for CountingStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user_by_email(email).await
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user_by_id(id).await
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.user_exists_by_email(email).await
    }

    async fn add_user(&self, user: &User) -> Result<()> {
        self.user_adds.fetch_add(1, Ordering::SeqCst);
        self.inner.add_user(user).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.inner.update_user(user).await
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>> {
        self.session_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_session(token).await
    }

    async fn add_session(&self, session: &Session) -> Result<()> {
        self.session_adds.fetch_add(1, Ordering::SeqCst);
        self.inner.add_session(session).await
    }

    async fn update_session(
        &self,
        session: &Session,
        expected_expiry: DateTime<Utc>,
    ) -> Result<bool> {
        self.session_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_session(session, expected_expiry).await
    }

    async fn delete_session(&self, token: Uuid) -> Result<()> {
        self.session_deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_session(token).await
    }
}

/// Seeds a user straight into the store, bypassing registration.
pub async fn seed_user(store: &dyn AuthStore, email: &str, secret: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: credential::hash_secret(secret).unwrap(),
        created_at: now,
        updated_at: now,
    };
    store.add_user(&user).await.unwrap();
    user
}
