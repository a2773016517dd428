// Per-key single-flight guard for cache mutations

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of keys with a mutation in flight
#[derive(Debug, Default)]
pub(crate) struct SingleFlight {
    pending: Mutex<HashSet<String>>,
}

impl SingleFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claim `key`; returns None while another claim on it is alive.
    ///
    /// The claim is released when the returned guard drops, on every path.
    pub(crate) fn try_claim(&self, key: &str) -> Option<FlightGuard<'_>> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !pending.insert(key.to_string()) {
            return None;
        }
        Some(FlightGuard {
            owner: self,
            key: key.to_string(),
        })
    }
}

/// Live claim on a key
#[derive(Debug)]
pub(crate) struct FlightGuard<'a> {
    owner: &'a SingleFlight,
    key: String,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
