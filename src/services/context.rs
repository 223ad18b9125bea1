//! Per-request authentication state and its transitions.

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AuthError, Result};
use crate::models::{session::Session, user::User};
use crate::services::credential;
use crate::services::session::{SessionFactory, SessionOutcome, SessionValidator};
use crate::store::AuthStore;
use crate::transport::TokenCarrier;
use crate::validation::auth::{normalize_email, validate_email, validate_password};

/// Request-scoped holder of the resolved identity.
///
/// A context is either unauthenticated or authenticated as exactly one user.
/// It is created fresh per request, never shared across concurrent requests,
/// and never persisted: every request resolves identity from scratch against
/// the store. The context also remembers which session resolved it, so
/// `logout` can invalidate that one session record.
pub struct AuthContext<'a> {
    store: &'a dyn AuthStore,
    carrier: &'a dyn TokenCarrier,
    config: &'a Config,
    user: Option<User>,
    session: Option<Session>,
}

impl<'a> AuthContext<'a> {
    /// Creates an unauthenticated context over the given capabilities.
    pub fn new(
        store: &'a dyn AuthStore,
        carrier: &'a dyn TokenCarrier,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            carrier,
            config,
            user: None,
            session: None,
        }
    }

    /// Whether an identity has been resolved in this context.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The resolved user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Authenticates with an email/secret pair and issues a new session.
    ///
    /// Unknown email and wrong secret collapse into the same
    /// `InvalidCredentials` so a caller cannot probe which accounts exist.
    /// On success the context transitions to authenticated and the carrier
    /// hands the new token to the client.
    ///
    /// # Arguments
    ///
    /// * `email` - The presented email address.
    /// * `secret` - The presented plaintext secret.
    /// * `persistent` - Whether to issue a long-lived session.
    ///
    /// # Returns
    ///
    /// A `Result` containing the issued `Session`.
    pub async fn login(&mut self, email: &str, secret: &str, persistent: bool) -> Result<Session> {
        if self.user.is_some() {
            return Err(AuthError::AlreadyAuthenticated);
        }

        validate_email(email)?;
        validate_password(secret)?;

        let email = normalize_email(email);
        tracing::debug!("🔐 Login attempt");

        let Some(user) = self.store.get_user_by_email(&email).await? else {
            // Burn the same Argon2 work as a real verification so an unknown
            // email is not distinguishable from a wrong secret by timing.
            credential::hash_secret(secret)?;
            tracing::debug!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !credential::verify_secret(secret, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong secret");
            return Err(AuthError::InvalidCredentials);
        }

        let session = SessionFactory::create(user.id, persistent, self.config);
        self.store.add_session(&session).await?;
        self.carrier.issue(session.token, session.expires_at);

        tracing::info!(user_id = %user.id, "✅ User logged in");

        self.user = Some(user);
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Drops the resolved identity and revokes the client-held token.
    ///
    /// Invalidates the session that resolved this context, if any.
    /// Idempotent: logging out an unauthenticated context is a no-op, not an
    /// error.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            self.store.delete_session(session.token).await?;
        }

        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "👋 User logged out");
        }

        self.carrier.revoke();
        Ok(())
    }

    /// Resolves the identity from a presented session token.
    ///
    /// Returns whether a user was resolved. Rejection carries no cause: the
    /// context stays unauthenticated and the stale client-held token is
    /// revoked.
    pub async fn resolve_from_token(&mut self, token: &str) -> Result<bool> {
        let validator = SessionValidator::new(self.store, self.config);

        match validator.validate(token).await? {
            SessionOutcome::Accepted { user, session } => {
                tracing::debug!(user_id = %user.id, "✅ Session resolved");
                self.user = Some(user);
                self.session = Some(session);
                Ok(true)
            }
            SessionOutcome::Rejected => {
                self.carrier.revoke();
                Ok(false)
            }
        }
    }

    /// Registers a new account.
    ///
    /// Never auto-authenticates: login is a separate explicit step. The
    /// confirmation is checked before any store lookup.
    ///
    /// # Arguments
    ///
    /// * `email` - The new account's email address.
    /// * `secret` - The new account's plaintext secret.
    /// * `confirm` - The secret confirmation.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `User`.
    pub async fn register(&mut self, email: &str, secret: &str, confirm: &str) -> Result<User> {
        if !self.config.registration_enabled {
            return Err(AuthError::RegistrationDisabled);
        }

        if self.user.is_some() {
            return Err(AuthError::AlreadyAuthenticated);
        }

        validate_email(email)?;
        validate_password(secret)?;

        if !credential::secrets_match(secret, confirm) {
            return Err(AuthError::ConfirmationMismatch);
        }

        let email = normalize_email(email);
        if self.store.user_exists_by_email(&email).await? {
            return Err(AuthError::EmailInUse);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: credential::hash_secret(secret)?,
            created_at: now,
            updated_at: now,
        };
        self.store.add_user(&user).await?;

        tracing::info!(user_id = %user.id, "✅ User registered");
        Ok(user)
    }

    /// Replaces the credential after re-verifying the current one.
    ///
    /// # Arguments
    ///
    /// * `current` - The current plaintext secret.
    /// * `new` - The replacement secret.
    /// * `confirm` - The replacement confirmation.
    pub async fn change_password(&mut self, current: &str, new: &str, confirm: &str) -> Result<()> {
        let Some(user) = self.user.as_ref() else {
            return Err(AuthError::NotAuthenticated);
        };

        if !credential::secrets_match(new, confirm) {
            return Err(AuthError::ConfirmationMismatch);
        }

        validate_password(new)?;

        if !credential::verify_secret(current, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password change rejected: wrong current secret");
            return Err(AuthError::InvalidCredentials);
        }

        // Persist first: the context only sees the new hash once the store
        // accepted it, so a failed write leaves no half-applied transition.
        let mut updated = user.clone();
        updated.password_hash = credential::hash_secret(new)?;
        updated.updated_at = Utc::now();
        self.store.update_user(&updated).await?;

        tracing::info!(user_id = %updated.id, "🔑 Password changed");
        self.user = Some(updated);
        Ok(())
    }

    /// Changes the account email after re-verifying the current secret.
    ///
    /// Fails with `EmailInUse` if a different account already holds the
    /// normalized address.
    ///
    /// # Arguments
    ///
    /// * `current_secret` - The current plaintext secret.
    /// * `new_email` - The replacement email address.
    pub async fn change_email(&mut self, current_secret: &str, new_email: &str) -> Result<()> {
        let Some(user) = self.user.as_ref() else {
            return Err(AuthError::NotAuthenticated);
        };

        validate_email(new_email)?;

        if !credential::verify_secret(current_secret, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Email change rejected: wrong current secret");
            return Err(AuthError::InvalidCredentials);
        }

        let new_email = normalize_email(new_email);
        if new_email != user.email && self.store.user_exists_by_email(&new_email).await? {
            return Err(AuthError::EmailInUse);
        }

        // Persist first: the context only sees the new address once the
        // store accepted it.
        let mut updated = user.clone();
        updated.email = new_email;
        updated.updated_at = Utc::now();
        self.store.update_user(&updated).await?;

        tracing::info!(user_id = %updated.id, "📧 Email changed");
        self.user = Some(updated);
        Ok(())
    }
}
