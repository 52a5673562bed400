//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, session check)
//! - Bind server to listener
//! - Drain pending log writes on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::LogItConfig;
use crate::http::handlers::{auth_form, authenticate, not_found, record_request, view_logs};
use crate::security::auth::{require_session, AuthGate};
use crate::store::LogStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub gate: Arc<AuthGate>,
    pub max_body_bytes: usize,
}

/// HTTP server for the logging appliance.
pub struct HttpServer {
    router: Router,
    store: Arc<LogStore>,
}

impl HttpServer {
    /// Create a server over an already loaded store.
    pub fn new(config: &LogItConfig, store: Arc<LogStore>) -> Self {
        let state = AppState {
            store: store.clone(),
            gate: Arc::new(AuthGate::from_config(config)),
            max_body_bytes: config.max_body_bytes,
        };

        let router = Self::build_router(config, state);
        Self { router, store }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &LogItConfig, state: AppState) -> Router {
        let logs = Router::new()
            .route("/logs", get(view_logs))
            .route_layer(middleware::from_fn_with_state(
                state.gate.clone(),
                require_session,
            ));

        Router::new()
            .route("/", any(record_request))
            .route("/auth", get(auth_form))
            .route("/authenticate", post(authenticate))
            .merge(logs)
            .fallback(not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
                    .layer(DefaultBodyLimit::max(config.max_body_bytes)),
            )
    }

    /// Run the server until `shutdown` fires, then wait for pending writes.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.store.flush().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
