//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the log directory if it is missing
//! - Load existing records before any listener is bound
//! - Bind the listener
//!
//! Any startup error is fatal.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::fs;
use tokio::net::TcpListener;

use crate::config::LogItConfig;
use crate::store::{LogStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create log directory {path}: {source}")]
    CreateLogDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("bind_host {0:?} is not an IP address")]
    InvalidBindAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Ensure `dir` exists, creating parents as needed.
pub async fn ensure_log_dir(dir: &Path) -> Result<(), StartupError> {
    tracing::debug!("Checking for log folder...");
    if fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(());
    }

    tracing::debug!("Creating log folder...");
    fs::create_dir_all(dir)
        .await
        .map_err(|source| StartupError::CreateLogDir {
            path: dir.display().to_string(),
            source,
        })
}

/// Prepare the log directory and load every existing record.
pub async fn load_store(config: &LogItConfig) -> Result<Arc<LogStore>, StartupError> {
    ensure_log_dir(&config.log_dir).await?;

    tracing::debug!("Loading existing logs...");
    let store = LogStore::load(&config.log_dir).await?;
    Ok(Arc::new(store))
}

/// Bind the configured address. Call only after the store is loaded.
pub async fn bind_listener(config: &LogItConfig) -> Result<TcpListener, StartupError> {
    let addr = config
        .bind_address()
        .ok_or_else(|| StartupError::InvalidBindAddress(config.bind_host.clone()))?;

    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}
