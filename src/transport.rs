//! Transport capability that carries the session token to the client.

use chrono::{DateTime, Utc};
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::config::CookieSettings;

/// Abstracts whatever client-held credential carries the session token
/// (cookie, header, ...).
///
/// The core only ever issues or revokes through this capability and never
/// manipulates transport state directly, so it is testable without any real
/// transport.
pub trait TokenCarrier: Send + Sync {
    /// Hands the token to the client, valid until `expires_at`.
    fn issue(&self, token: Uuid, expires_at: DateTime<Utc>);

    /// Clears the client-held token.
    fn revoke(&self);
}

/// A `TokenCarrier` that stores the token in a cookie.
pub struct CookieCarrier {
    cookies: Cookies,
    settings: CookieSettings,
}

impl CookieCarrier {
    /// Creates a carrier over the request's cookie jar.
    pub fn new(cookies: Cookies, settings: CookieSettings) -> Self {
        Self { cookies, settings }
    }

    fn build(&self, value: String, max_age: Duration) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.settings.name.clone(), value);

        if self.settings.http_only {
            cookie.set_http_only(true);
        }

        if self.settings.secure {
            cookie.set_secure(true);
        }

        if let Some(domain) = &self.settings.domain {
            cookie.set_domain(domain.clone());
        }

        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(max_age);
        cookie.set_path(self.settings.path.clone());

        cookie
    }
}

impl TokenCarrier for CookieCarrier {
    fn issue(&self, token: Uuid, expires_at: DateTime<Utc>) {
        let remaining = (expires_at - Utc::now()).num_seconds().max(0);
        let cookie = self.build(token.to_string(), Duration::seconds(remaining));
        self.cookies.add(cookie);
        tracing::debug!("✅ Session cookie issued: {}", self.settings.name);
    }

    fn revoke(&self) {
        let cookie = self.build(String::new(), Duration::seconds(0));
        self.cookies.remove(cookie);
        tracing::debug!("Session cookie cleared: {}", self.settings.name);
    }
}
