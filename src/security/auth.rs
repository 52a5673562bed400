//! Shared-secret authentication and the session cookie.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::LogItConfig;
use crate::observability::metrics;
use crate::security::rate_limit::AttemptLimiter;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "AUTH";

/// Session cookie lifetime: 24 hours.
pub const SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Result of one authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted,
    Denied,
    RateLimited,
}

impl AuthOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthOutcome::Granted => "granted",
            AuthOutcome::Denied => "denied",
            AuthOutcome::RateLimited => "rate_limited",
        }
    }
}

/// Validates secrets and session cookies against the configured secret.
pub struct AuthGate {
    secret: Option<String>,
    limiter: AttemptLimiter,
}

impl AuthGate {
    /// An empty secret is treated as no secret.
    pub fn new(secret: Option<String>, ratelimit_ms: u64) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            limiter: AttemptLimiter::new(ratelimit_ms),
        }
    }

    pub fn from_config(config: &LogItConfig) -> Self {
        Self::new(config.secret().map(str::to_owned), config.authenticate_ratelimit_ms)
    }

    /// Evaluate a submitted secret from `client` at `now_ms`.
    pub fn attempt(&self, client: &str, submitted: Option<&str>, now_ms: u64) -> AuthOutcome {
        let outcome = if !self.limiter.try_attempt(client, now_ms) {
            AuthOutcome::RateLimited
        } else {
            match (&self.secret, submitted) {
                (Some(secret), Some(given)) if given == secret => AuthOutcome::Granted,
                _ => AuthOutcome::Denied,
            }
        };

        metrics::record_auth_attempt(outcome.as_str());
        outcome
    }

    /// `Set-Cookie` value for a fresh session, if a secret is configured.
    pub fn session_cookie(&self) -> Option<String> {
        let secret = self.secret.as_deref()?;
        Some(format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            AUTH_COOKIE,
            encode_cookie_value(secret),
            SESSION_MAX_AGE_SECS
        ))
    }

    /// Whether the request carries a session cookie matching the secret.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return false;
        };
        cookie_value(headers, AUTH_COOKIE).is_some_and(|v| v == encode_cookie_value(secret))
    }
}

/// Gate a route behind a valid session; otherwise redirect to the auth form.
pub async fn require_session(
    State(gate): State<Arc<AuthGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if gate.is_authorized(request.headers()) {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "No valid session, redirecting to /auth");
    (StatusCode::FOUND, [(header::LOCATION, "/auth")]).into_response()
}

fn encode_cookie_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// First value of cookie `name` across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
