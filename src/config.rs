use std::env;
use anyhow::{Context, Result};
use chrono::Duration;

/// Attributes of the cookie that carries the session token.
///
/// Opaque to the core: these are handed to the transport carrier unchanged.
#[derive(Clone, Debug)]
pub struct CookieSettings {
    /// The cookie name.
    pub name: String,
    /// The cookie path.
    pub path: String,
    /// The cookie domain, if restricted.
    pub domain: Option<String>,
    /// Whether the cookie is only sent over HTTPS.
    pub secure: bool,
    /// Whether the cookie is hidden from client-side scripts.
    pub http_only: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "session_id".to_string(),
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: true,
        }
    }
}

/// The authentication core's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether self-service registration is accepted.
    pub registration_enabled: bool,
    /// Lifetime of a non-persistent (single browser visit) session.
    pub short_session_ttl: Duration,
    /// Lifetime of a persistent ("remember me") session.
    pub long_session_ttl: Duration,
    /// How close to expiry a validated session gets its expiry slid forward.
    pub refresh_window: Duration,
    /// Attributes of the client-held token cookie.
    pub cookie: CookieSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registration_enabled: true,
            short_session_ttl: Duration::minutes(30),
            long_session_ttl: Duration::days(14),
            refresh_window: Duration::minutes(10),
            cookie: CookieSettings::default(),
        }
    }
}

impl Config {
    /// Creates a `Config` from environment variables.
    ///
    /// Anything unset falls back to the `Default` values.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        Ok(Self {
            registration_enabled: env::var("REGISTRATION_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.registration_enabled),
            short_session_ttl: match env::var("SHORT_SESSION_TTL_MINUTES") {
                Ok(v) => Duration::minutes(
                    v.parse().context("Invalid SHORT_SESSION_TTL_MINUTES")?,
                ),
                Err(_) => defaults.short_session_ttl,
            },
            long_session_ttl: match env::var("LONG_SESSION_TTL_DAYS") {
                Ok(v) => Duration::days(v.parse().context("Invalid LONG_SESSION_TTL_DAYS")?),
                Err(_) => defaults.long_session_ttl,
            },
            refresh_window: match env::var("SESSION_REFRESH_WINDOW_MINUTES") {
                Ok(v) => Duration::minutes(
                    v.parse().context("Invalid SESSION_REFRESH_WINDOW_MINUTES")?,
                ),
                Err(_) => defaults.refresh_window,
            },
            cookie: CookieSettings {
                name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie.name),
                path: env::var("SESSION_COOKIE_PATH").unwrap_or(defaults.cookie.path),
                domain: env::var("SESSION_COOKIE_DOMAIN").ok(),
                secure: env::var("SESSION_COOKIE_SECURE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(defaults.cookie.secure),
                http_only: env::var("SESSION_COOKIE_HTTP_ONLY")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(defaults.cookie.http_only),
            },
        })
    }
}
