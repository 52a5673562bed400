//! log-it: a minimal HTTP request-logging appliance.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use config::LogItConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::LogStore;
