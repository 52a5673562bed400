//! The captured form of one inbound request.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

/// One recorded request.
///
/// The id is not part of the document; it is the file name (`<id>.json`)
/// and the key in the log index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Lowercase header names to their (joined) values.
    pub headers: BTreeMap<String, String>,
    /// Parsed form body, `{}` when nothing was parsed.
    pub body: serde_json::Value,
    /// Peer address of the client.
    #[serde(rename = "ip")]
    pub client_address: String,
    /// Scheme the request arrived over.
    pub protocol: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl LogRecord {
    /// Serialize as JSON indented with four spaces.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_unix_ms() -> u64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
