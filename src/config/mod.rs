//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → LOG_IT_* environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → LogItConfig (validated, immutable)
//!     → shared with the HTTP layer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::LogItConfig;
pub use validation::ValidationError;
