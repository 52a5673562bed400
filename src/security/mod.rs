//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! POST /authenticate:
//!     → rate_limit.rs (per-address attempt interval)
//!     → auth.rs (secret check, session cookie)
//!
//! GET /logs:
//!     → auth.rs require_session (cookie check, else redirect to /auth)
//! ```
//!
//! # Design Decisions
//! - Fail closed: no configured secret means nobody gets in
//! - No trust in client input

pub mod auth;
pub mod rate_limit;

pub use auth::{AuthGate, AuthOutcome, AUTH_COOKIE};
pub use rate_limit::AttemptLimiter;
