use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The authentication core's error type.
///
/// Expected rejections are typed variants returned to the immediate caller.
/// Storage failures are a separate infrastructure class (`Store`) that is
/// never retried here. Session-token rejection is deliberately NOT an error
/// kind: `resolve_from_token` reports it as a plain boolean so callers cannot
/// distinguish why a token failed.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The context already holds a resolved identity.
    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// The operation requires a resolved identity.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Unknown account or wrong secret. Unified so a caller cannot tell
    /// which check failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Self-service registration is switched off.
    #[error("Registration is disabled")]
    RegistrationDisabled,

    /// The secret and its confirmation do not match.
    #[error("Confirmation does not match")]
    ConfirmationMismatch,

    /// Another account already uses this email address.
    #[error("Email address already in use")]
    EmailInUse,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A credential-hashing error.
    #[error("Credential hashing error: {0}")]
    Hash(String),

    /// A storage error.
    #[error("Storage error: {0}")]
    Store(#[source] anyhow::Error),
}

/// A `Result` type that uses `AuthError` as the error type.
pub type Result<T> = std::result::Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::AlreadyAuthenticated => {
                tracing::debug!("Already authenticated");
                (StatusCode::CONFLICT, "Already authenticated".to_string())
            }

            AuthError::NotAuthenticated => {
                tracing::debug!("Not authenticated");
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }

            AuthError::InvalidCredentials => {
                tracing::warn!("Authentication failed");
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }

            AuthError::RegistrationDisabled => {
                tracing::debug!("Registration attempt while disabled");
                (StatusCode::FORBIDDEN, "Registration is disabled".to_string())
            }

            AuthError::ConfirmationMismatch => {
                tracing::debug!("Confirmation mismatch");
                (StatusCode::BAD_REQUEST, "Confirmation does not match".to_string())
            }

            AuthError::EmailInUse => {
                tracing::debug!("Email already in use");
                (StatusCode::CONFLICT, "Email address already in use".to_string())
            }

            AuthError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AuthError::Hash(ref e) => {
                tracing::error!("Credential hashing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AuthError::Store(ref e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
