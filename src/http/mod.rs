//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs
//!         /             → request.rs (capture) → store → 404
//!         /auth         → templates.rs form
//!         /authenticate → security gate → cookie + redirect | 403 | 429
//!         /logs         → session check → templates.rs listing | redirect
//! ```

pub mod handlers;
pub mod request;
pub mod server;
pub mod templates;

pub use server::{AppState, HttpServer};
