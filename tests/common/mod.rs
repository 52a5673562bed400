//! Shared harness for integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log_it::config::LogItConfig;
use log_it::http::HttpServer;
use log_it::lifecycle::{startup, Shutdown};
use log_it::store::LogStore;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const SECRET: &str = "correct-horse";

/// A running appliance bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<LogStore>,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop accepting, drain, and wait for pending log writes.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Config rooted at `log_dir` with test-friendly defaults.
pub fn config_for(log_dir: &Path) -> LogItConfig {
    LogItConfig {
        log_dir: log_dir.to_path_buf(),
        bind_host: "127.0.0.1".into(),
        port: 0,
        auth: Some(SECRET.into()),
        debug: false,
        authenticate_ratelimit_ms: 0,
        ..Default::default()
    }
}

/// Load the store, bind, and serve in the background.
pub async fn start_server(config: LogItConfig) -> TestServer {
    let store = startup::load_store(&config).await.unwrap();
    let listener = startup::bind_listener(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(&config, store.clone());
    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        store,
        shutdown,
        handle,
    }
}

/// Fresh temp dir plus a `log/` path inside it that does not exist yet.
pub fn temp_log_dir() -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let log_dir = root.path().join("log");
    (root, log_dir)
}

/// A client that never follows redirects, so 3xx responses can be inspected.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// `AUTH=<value>` from a response's `Set-Cookie`, if present.
#[allow(dead_code)]
pub fn auth_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("AUTH="))
        .map(str::to_string)
}
