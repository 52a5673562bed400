//! In-memory log index backed by one file per record.
//!
//! # Responsibilities
//! - Rebuild the index and next-id counter from the log directory at startup
//! - Assign ids and insert records synchronously
//! - Persist records in the background without blocking the caller
//!
//! The counter and the index share one lock, so ids stay unique and ordered
//! on a multi-threaded runtime.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::observability::metrics;
use crate::store::record::LogRecord;

/// Maximum number of log files read concurrently at startup.
const LOAD_CONCURRENCY: usize = 64;

/// Called when a background write fails. Receives the record id and the error.
pub type WriteErrorHook = Arc<dyn Fn(u64, &io::Error) + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to list log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record ids exhausted")]
    IdsExhausted,
}

struct Index {
    next_id: u64,
    entries: BTreeMap<u64, Arc<str>>,
}

/// The log store: id → serialized record, plus the next-id counter.
pub struct LogStore {
    dir: PathBuf,
    index: Mutex<Index>,
    pending_writes: Mutex<JoinSet<()>>,
    on_write_error: WriteErrorHook,
}

impl LogStore {
    /// Scan `dir` and load every `<id>.json` file into memory.
    ///
    /// Returns once every read has completed or failed. Files that cannot be
    /// read are skipped, but their id still advances the counter.
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let read_dir_err = |source| StoreError::ReadDir {
            path: dir.clone(),
            source,
        };

        let mut dir_entries = fs::read_dir(&dir).await.map_err(read_dir_err)?;
        let limit = Arc::new(Semaphore::new(LOAD_CONCURRENCY));
        let mut reads = JoinSet::new();
        let mut next_id = 1u64;

        loop {
            let entry = match dir_entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "Stopped scanning log directory early");
                    break;
                }
            };

            let Some(id) = parse_log_file_name(&entry.file_name()) else {
                continue;
            };
            next_id = next_id.max(id.saturating_add(1));

            let path = entry.path();
            let limit = limit.clone();
            reads.spawn(async move {
                let _permit = limit.acquire_owned().await.ok();
                let result = fs::read(&path).await;
                (id, path, result)
            });
        }

        let mut entries: BTreeMap<u64, Arc<str>> = BTreeMap::new();
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok((id, _, Ok(bytes))) => {
                    entries.insert(id, Arc::from(String::from_utf8_lossy(&bytes)));
                }
                Ok((id, path, Err(e))) => {
                    tracing::warn!(id, path = %path.display(), error = %e, "Skipping unreadable log file");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Log file read task failed");
                }
            }
        }

        tracing::debug!("Loaded {} existing logs", next_id - 1);
        metrics::record_store_size(entries.len());

        Ok(Self {
            dir,
            index: Mutex::new(Index { next_id, entries }),
            pending_writes: Mutex::new(JoinSet::new()),
            on_write_error: Arc::new(default_write_error_hook),
        })
    }

    /// Replace the hook invoked when a background write fails.
    pub fn with_write_error_hook(mut self, hook: WriteErrorHook) -> Self {
        self.on_write_error = hook;
        self
    }

    /// Serialize and append a record. See [`LogStore::append_raw`].
    pub fn append(&self, record: &LogRecord) -> Result<u64, StoreError> {
        self.append_raw(record.to_pretty_json()?)
    }

    /// Assign the next id to `content`, make it visible in memory and start
    /// writing it to `<id>.json`.
    ///
    /// Must be called from within a Tokio runtime. The write is not awaited;
    /// failures go to the write-error hook and the record stays memory-only.
    /// Once the counter reaches `u64::MAX` nothing more is assigned.
    pub fn append_raw(&self, content: String) -> Result<u64, StoreError> {
        let content: Arc<str> = Arc::from(content);
        let (id, len) = {
            let mut index = self.lock_index();
            let id = index.next_id;
            index.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
            index.entries.insert(id, content.clone());
            (id, index.entries.len())
        };
        metrics::record_store_size(len);

        let path = self.dir.join(format!("{id}.json"));
        let hook = self.on_write_error.clone();
        let mut pending = self.lock_pending();
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            if let Err(e) = fs::write(&path, content.as_bytes()).await {
                metrics::record_write_failure();
                hook(id, &e);
            }
        });

        Ok(id)
    }

    /// Content stored under `id`, if any.
    pub fn get(&self, id: u64) -> Option<Arc<str>> {
        self.lock_index().entries.get(&id).cloned()
    }

    /// Lazily yield `(id, content)` for ids `1..next_id` in ascending order.
    ///
    /// The upper bound is fixed when `list` is called; each step seeks the
    /// next stored id in the current index, so gaps cost nothing.
    pub fn list(&self) -> impl Iterator<Item = (u64, Arc<str>)> + '_ {
        let upper = self.next_id();
        let mut cursor = 1;
        std::iter::from_fn(move || {
            let index = self.lock_index();
            let (&id, content) = index.entries.range(cursor..upper).next()?;
            cursor = id + 1;
            Some((id, content.clone()))
        })
    }

    /// The id the next appended record will receive.
    pub fn next_id(&self) -> u64 {
        self.lock_index().next_id
    }

    /// Number of records held in memory.
    pub fn len(&self) -> usize {
        self.lock_index().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every write started so far to finish.
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.lock_pending());
        while pending.join_next().await.is_some() {}
    }

    fn lock_index(&self) -> MutexGuard<'_, Index> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.pending_writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn default_write_error_hook(id: u64, error: &io::Error) {
    tracing::warn!(id, error = %error, "Failed to persist request; kept in memory only");
}

/// `<digits>.json` with a value in `1..u64::MAX`, else `None`.
///
/// `u64::MAX` is excluded so the counter can always move past a loaded id.
fn parse_log_file_name(name: &OsStr) -> Option<u64> {
    let stem = name.to_str()?.strip_suffix(".json")?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse::<u64>().ok().filter(|&id| id > 0 && id < u64::MAX)
}
