//! Pending request store - the correlation state shared between the
//! dispatching and receiving paths.

use crate::correlation::CorrelationId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Internal consistency errors raised by the store.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The id is already registered. Unreachable with freshly generated
    /// random ids, but handled rather than assumed away.
    #[error("correlation id already registered: {0}")]
    DuplicateCorrelation(CorrelationId),
}

/// A request waiting for its response.
struct PendingRequest {
    /// Single-assignment slot observed by the waiting caller.
    sender: oneshot::Sender<String>,
    /// When the request was registered.
    created_at: Instant,
}

/// Counters for store activity.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Total requests registered.
    pub total_registered: AtomicU64,
    /// Total requests resolved with a response.
    pub total_resolved: AtomicU64,
    /// Total requests evicted without a response.
    pub total_evicted: AtomicU64,
    /// Responses whose waiter had already gone away.
    pub total_orphaned: AtomicU64,
}

/// Concurrent map of correlation id to pending request.
///
/// Flow:
/// 1. The dispatcher registers a fresh id and keeps the receiver.
/// 2. The dispatcher sends the request with the id attached.
/// 3. The listener resolves the id when the response arrives.
/// 4. The dispatcher awaits the receiver, or evicts the id on timeout.
///
/// `resolve` and `evict` racing on one id are mutually exclusive per key:
/// both remove the entry, and the map hands it to exactly one of them. The
/// map is sharded, so unrelated keys never contend on a single lock and
/// the delivery path is never blocked by other callers.
pub struct PendingRequestStore {
    pending: DashMap<CorrelationId, PendingRequest>,
    stats: PendingStats,
}

impl PendingRequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            stats: PendingStats::default(),
        }
    }

    /// Register a pending request under `id` and return the receiver the
    /// caller waits on.
    pub fn register(
        &self,
        id: CorrelationId,
    ) -> Result<oneshot::Receiver<String>, RegistryError> {
        let receiver = match self.pending.entry(id) {
            Entry::Occupied(_) => return Err(RegistryError::DuplicateCorrelation(id)),
            Entry::Vacant(slot) => {
                let (tx, rx) = oneshot::channel();
                slot.insert(PendingRequest {
                    sender: tx,
                    created_at: Instant::now(),
                });
                rx
            }
        };

        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
        debug!(correlation_id = %id, "registered pending request");
        Ok(receiver)
    }

    /// Complete the pending request for `id` with `response`.
    ///
    /// Returns true if an entry was present and its waiter received the
    /// value. Returns false when the id is unknown (already resolved or
    /// evicted - the expected outcome for a reply that lost the race) or
    /// when the waiter has gone away.
    pub fn resolve(&self, id: &CorrelationId, response: String) -> bool {
        if let Some((_, request)) = self.pending.remove(id) {
            let waited = request.created_at.elapsed();
            match request.sender.send(response) {
                Ok(()) => {
                    self.stats.total_resolved.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        correlation_id = %id,
                        waited_ms = waited.as_millis() as u64,
                        "resolved pending request"
                    );
                    true
                }
                Err(_) => {
                    self.stats.total_orphaned.fetch_add(1, Ordering::Relaxed);
                    debug!(correlation_id = %id, "waiter gone, response dropped");
                    false
                }
            }
        } else {
            false
        }
    }

    /// Remove the entry for `id` without resolving it.
    ///
    /// Returns whether an entry was actually present, letting the timeout
    /// path distinguish "I won the race" from "the listener already
    /// resolved it".
    pub fn evict(&self, id: &CorrelationId) -> bool {
        if self.pending.remove(id).is_some() {
            self.stats.total_evicted.fetch_add(1, Ordering::Relaxed);
            debug!(correlation_id = %id, "evicted pending request");
            true
        } else {
            false
        }
    }

    /// Number of requests currently pending.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check whether `id` is pending.
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.pending.contains_key(id)
    }

    /// Activity counters.
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingRequestStore {
    fn default() -> Self {
        Self::new()
    }
}
