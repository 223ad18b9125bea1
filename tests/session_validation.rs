mod common;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::{CountingStore, RecordingCarrier, seed_user};
use gatehouse::error::Result;
use gatehouse::models::{session::Session, user::User};
use gatehouse::{
    AuthContext, AuthStore, Config, MemoryStore, SessionFactory, SessionOutcome, SessionValidator,
};
use uuid::Uuid;

fn test_config() -> Config {
    Config::default()
}

/// Seeds a session directly, optionally overriding its expiry.
async fn seed_session(
    store: &dyn AuthStore,
    user: &User,
    config: &Config,
    expires_at: Option<DateTime<Utc>>,
) -> Session {
    let mut session = SessionFactory::create(user.id, false, config);
    if let Some(expiry) = expires_at {
        session.expires_at = expiry;
    }
    store.add_session(&session).await.unwrap();
    session
}

#[tokio::test]
async fn malformed_token_is_rejected_without_store_access() {
    let store = CountingStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    for junk in [
        "",
        "not-a-token",
        "d27f263cf8cd4d3ba648e2e746cc764a",                // unhyphenated
        "d27f263c-f8cd-4d3b-a648-e2e746cc764a-extra",      // too long
        "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz",            // bad charset
    ] {
        assert!(!ctx.resolve_from_token(junk).await.unwrap());
    }

    assert_eq!(CountingStore::count(&store.session_reads), 0);
    assert!(!ctx.is_authenticated());
}

#[tokio::test]
async fn unknown_token_is_rejected_without_mutation() {
    let store = CountingStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    let resolved = ctx
        .resolve_from_token(&Uuid::new_v4().to_string())
        .await
        .unwrap();

    assert!(!resolved);
    assert!(!ctx.is_authenticated());
    assert_eq!(CountingStore::count(&store.session_reads), 1);
    assert_eq!(CountingStore::count(&store.session_deletes), 0);
    assert_eq!(CountingStore::count(&store.session_updates), 0);

    // Rejection tells the caller to clear the stale client-held token.
    assert_eq!(carrier.revoked_count(), 1);
}

#[tokio::test]
async fn expired_token_is_deleted_and_second_attempt_is_idempotent() {
    let store = CountingStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();
    let user = seed_user(&store, "a@b.com", "secret123").await;
    let session = seed_session(&store, &user, &config, Some(Utc::now() - Duration::seconds(1))).await;

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    assert!(!ctx.resolve_from_token(&session.token.to_string()).await.unwrap());
    assert_eq!(CountingStore::count(&store.session_deletes), 1);
    assert!(store.get_session(session.token).await.unwrap().is_none());

    // Same token again: rejected, nothing left to delete.
    assert!(!ctx.resolve_from_token(&session.token.to_string()).await.unwrap());
    assert_eq!(CountingStore::count(&store.session_deletes), 1);
}

#[tokio::test]
async fn session_whose_owner_vanished_is_deleted() {
    let store = MemoryStore::new();
    let config = test_config();

    // A session pointing at a user id that was never stored.
    let orphan = User {
        id: Uuid::new_v4(),
        email: "ghost@b.com".to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let session = seed_session(&store, &orphan, &config, None).await;

    let validator = SessionValidator::new(&store, &config);
    let outcome = validator.validate(&session.token.to_string()).await.unwrap();

    assert!(!outcome.is_accepted());
    assert!(store.get_session(session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn token_inside_refresh_window_gets_exactly_one_update() {
    let store = CountingStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();
    let user = seed_user(&store, "a@b.com", "secret123").await;

    // Five minutes left, ten-minute window: due for a refresh.
    let old_expiry = Utc::now() + Duration::minutes(5);
    let session = seed_session(&store, &user, &config, Some(old_expiry)).await;

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    assert!(ctx.resolve_from_token(&session.token.to_string()).await.unwrap());

    assert_eq!(CountingStore::count(&store.session_updates), 1);
    let stored = store.get_session(session.token).await.unwrap().unwrap();
    assert!(stored.expires_at > old_expiry, "refresh must extend expiry forward");
}

#[tokio::test]
async fn token_outside_refresh_window_is_not_rewritten() {
    let store = CountingStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();
    let user = seed_user(&store, "a@b.com", "secret123").await;
    let session = seed_session(&store, &user, &config, None).await;

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    assert!(ctx.resolve_from_token(&session.token.to_string()).await.unwrap());

    assert_eq!(CountingStore::count(&store.session_updates), 0);
    let stored = store.get_session(session.token).await.unwrap().unwrap();
    assert_eq!(stored.expires_at, session.expires_at);
}

/// A store whose compare-and-set always reports a lost race.
struct ContestedStore(MemoryStore);

#[async_trait]
impl AuthStore for ContestedStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.0.get_user_by_email(email).await
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.0.get_user_by_id(id).await
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        self.0.user_exists_by_email(email).await
    }

    async fn add_user(&self, user: &User) -> Result<()> {
        self.0.add_user(user).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.0.update_user(user).await
    }

    async fn get_session(&self, token: Uuid) -> Result<Option<Session>> {
        self.0.get_session(token).await
    }

    async fn add_session(&self, session: &Session) -> Result<()> {
        self.0.add_session(session).await
    }

    async fn update_session(&self, _session: &Session, _expected: DateTime<Utc>) -> Result<bool> {
        Ok(false)
    }

    async fn delete_session(&self, token: Uuid) -> Result<()> {
        self.0.delete_session(token).await
    }
}

#[tokio::test]
async fn losing_the_refresh_race_still_accepts_the_session() {
    let store = ContestedStore(MemoryStore::new());
    let config = test_config();
    let user = seed_user(&store, "a@b.com", "secret123").await;
    let session = seed_session(&store, &user, &config, Some(Utc::now() + Duration::minutes(5))).await;

    let validator = SessionValidator::new(&store, &config);
    let outcome = validator.validate(&session.token.to_string()).await.unwrap();

    match outcome {
        SessionOutcome::Accepted { user: resolved, .. } => assert_eq!(resolved.id, user.id),
        SessionOutcome::Rejected => panic!("lost refresh race must not reject the session"),
    }
}

#[tokio::test]
async fn accepted_token_does_not_revoke_the_carrier() {
    let store = MemoryStore::new();
    let carrier = RecordingCarrier::new();
    let config = test_config();
    let user = seed_user(&store, "a@b.com", "secret123").await;
    let session = seed_session(&store, &user, &config, None).await;

    let mut ctx = AuthContext::new(&store, &carrier, &config);
    assert!(ctx.resolve_from_token(&session.token.to_string()).await.unwrap());
    assert_eq!(carrier.revoked_count(), 0);
    assert_eq!(ctx.current_user().unwrap().id, user.id);
}
