//! Queue-backed processor: the dispatching half of the correlation engine.

use crate::channel::{OutboundMessage, RequestSender};
use crate::config::QueueConfig;
use crate::correlation::CorrelationId;
use crate::listener::ResponseListener;
use crate::pending::PendingRequestStore;
use async_trait::async_trait;
use relay_api::{ProcessorError, TextProcessor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Text processor that relays work to remote workers over a message
/// channel.
///
/// Each `process` call tags the payload with a fresh correlation id,
/// sends it on the request channel, and waits - bounded by the configured
/// timeout - for the listener to resolve the matching response. The path
/// is fail-open: on send failure or timeout the caller gets the original
/// payload back, never an error.
///
/// Safe to call concurrently from many tasks; every invocation owns an
/// independent id and slot and never blocks another.
pub struct QueueProcessor {
    store: Arc<PendingRequestStore>,
    sender: Arc<dyn RequestSender>,
    response_timeout: Duration,
}

impl QueueProcessor {
    /// Create a processor sending requests through `sender`.
    pub fn new(sender: Arc<dyn RequestSender>, config: QueueConfig) -> Self {
        Self {
            store: Arc::new(PendingRequestStore::new()),
            sender,
            response_timeout: config.response_timeout,
        }
    }

    /// Listener for the response channel, sharing this processor's
    /// correlation state. Hand it to the transport at wiring time.
    pub fn listener(&self) -> ResponseListener {
        ResponseListener::new(Arc::clone(&self.store))
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.store.pending_count()
    }

    /// Activity counters of the underlying store.
    pub fn stats(&self) -> &crate::pending::PendingStats {
        self.store.stats()
    }

    async fn dispatch(&self, text: &str) -> String {
        let id = CorrelationId::new();

        let mut receiver = match self.store.register(id) {
            Ok(receiver) => receiver,
            Err(e) => {
                error!(
                    correlation_id = %id,
                    error = %e,
                    "correlation id collision, returning input unprocessed"
                );
                return text.to_owned();
            }
        };

        if let Err(e) = self.sender.send(OutboundMessage::new(text, id)).await {
            self.store.evict(&id);
            warn!(
                correlation_id = %id,
                error = %e,
                "request send failed, returning input unprocessed"
            );
            return text.to_owned();
        }
        debug!(correlation_id = %id, "sent processing request");

        match tokio::time::timeout(self.response_timeout, &mut receiver).await {
            Ok(Ok(processed)) => processed,
            Ok(Err(_)) => {
                // Slot dropped without a value; nothing left to wait for.
                warn!(
                    correlation_id = %id,
                    "response slot closed, returning input unprocessed"
                );
                text.to_owned()
            }
            Err(_) => {
                if self.store.evict(&id) {
                    warn!(
                        correlation_id = %id,
                        timeout_ms = self.response_timeout.as_millis() as u64,
                        "timed out waiting for response, returning input unprocessed"
                    );
                    text.to_owned()
                } else {
                    // The listener resolved this id between the deadline
                    // and the eviction; the slot holds (or is about to
                    // hold) the response, which is never discarded.
                    match receiver.await {
                        Ok(processed) => processed,
                        Err(_) => text.to_owned(),
                    }
                }
            }
        }
    }
}

#[async_trait]
impl TextProcessor for QueueProcessor {
    async fn process(&self, text: &str) -> Result<String, ProcessorError> {
        Ok(self.dispatch(text).await)
    }
}
