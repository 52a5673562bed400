//! Per-address throttling of authentication attempts.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Tracks the last authentication attempt per client address.
///
/// Not persisted: a restart forgets every address.
pub struct AttemptLimiter {
    last_attempt: DashMap<String, u64>,
    interval_ms: u64,
}

impl AttemptLimiter {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            last_attempt: DashMap::new(),
            interval_ms,
        }
    }

    /// Admit or reject an attempt from `client` at `now_ms`.
    ///
    /// An admitted attempt becomes the new last attempt. A rejected one leaves
    /// the table untouched. The check and the update hold the entry lock
    /// together.
    pub fn try_attempt(&self, client: &str, now_ms: u64) -> bool {
        match self.last_attempt.entry(client.to_string()) {
            Entry::Occupied(mut last) => {
                if now_ms.saturating_sub(*last.get()) < self.interval_ms {
                    return false;
                }
                last.insert(now_ms);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(now_ms);
                true
            }
        }
    }

    /// Timestamp of the last admitted attempt from `client`.
    #[cfg(test)]
    fn last_attempt(&self, client: &str) -> Option<u64> {
        self.last_attempt.get(client).map(|t| *t)
    }
}
