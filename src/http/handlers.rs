//! Route handlers.

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::http::request::{capture_headers, client_address, form_field, parse_form_body};
use crate::http::server::AppState;
use crate::http::templates;
use crate::observability::metrics;
use crate::security::AuthOutcome;
use crate::store::{now_unix_ms, LogRecord};

/// Record the request and answer 404, whatever happens while recording.
pub async fn record_request(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let protocol = request.uri().scheme_str().unwrap_or("http").to_string();
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding unreadable request body");
            Bytes::new()
        }
    };

    let timestamp = now_unix_ms();
    let record = LogRecord {
        headers: capture_headers(&parts.headers),
        body: parse_form_body(&parts.headers, &body),
        client_address: client_address(&addr),
        protocol,
        timestamp,
    };

    match state.store.append(&record) {
        Ok(id) => {
            tracing::debug!("Logging request #{} at {}", id, timestamp);
            tracing::debug!("Storing request #{}", id);
            metrics::record_request_logged();
        }
        Err(e) => tracing::warn!(error = %e, "Failed to store request"),
    }

    not_found().await
}

pub async fn auth_form() -> Html<&'static str> {
    Html(templates::AUTH_FORM)
}

pub async fn authenticate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = client_address(&addr);
    let submitted = form_field(&headers, &body, "auth");

    match state.gate.attempt(&client, submitted.as_deref(), now_unix_ms()) {
        AuthOutcome::Granted => match state.gate.session_cookie() {
            Some(cookie) => {
                tracing::info!(client = %client, "Authentication succeeded");
                (
                    StatusCode::FOUND,
                    [(header::SET_COOKIE, cookie), (header::LOCATION, "/logs".to_string())],
                )
                    .into_response()
            }
            None => incorrect_auth(),
        },
        AuthOutcome::Denied => {
            tracing::warn!(client = %client, "Authentication failed");
            incorrect_auth()
        }
        AuthOutcome::RateLimited => {
            tracing::warn!(client = %client, "Authentication attempt rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Html(templates::try_again(templates::WAIT_BEFORE_RETRY)),
            )
                .into_response()
        }
    }
}

/// Full log listing. Mounted behind the session check.
pub async fn view_logs(State(state): State<AppState>) -> Html<String> {
    Html(templates::log_list(state.store.list()))
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn incorrect_auth() -> Response {
    (
        StatusCode::FORBIDDEN,
        Html(templates::try_again(templates::INCORRECT_AUTH)),
    )
        .into_response()
}
