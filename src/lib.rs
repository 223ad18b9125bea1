//! Authentication and session-lifecycle core.
//!
//! Gatehouse decides whether a presented credential or session token
//! establishes an authenticated identity, and governs the creation,
//! validation, refresh, and invalidation of session tokens. Storage and
//! transport are consumed as capabilities ([`store::AuthStore`] and
//! [`transport::TokenCarrier`]), so the core runs against any backend and
//! serves any front-end that needs per-request identity resolution.

pub mod config;
pub mod error;
pub mod store;
pub mod transport;

pub mod models {
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod context;
    pub mod credential;
    pub mod session;
}

pub mod validation {
    pub mod auth;
}

pub use config::{Config, CookieSettings};
pub use error::{AuthError, Result};
pub use models::session::Session;
pub use models::user::User;
pub use services::context::AuthContext;
pub use services::session::{SessionFactory, SessionOutcome, SessionValidator};
pub use store::AuthStore;
pub use store::memory::MemoryStore;
pub use transport::{CookieCarrier, TokenCarrier};
