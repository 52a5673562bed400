//! Request log storage.
//!
//! # Data Flow
//! ```text
//! startup:   log dir → index.rs (scan <id>.json, bounded concurrent reads)
//! recording: LogRecord (record.rs) → pretty JSON → index (sync) → <id>.json (background)
//! viewing:   index → list() in ascending id order
//! ```

pub mod index;
pub mod record;

pub use index::{LogStore, StoreError, WriteErrorHook};
pub use record::{now_unix_ms, LogRecord};
