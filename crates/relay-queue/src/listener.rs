//! Inbound response handling.

use crate::channel::{ChannelError, InboundMessage, ResponseReceiver};
use crate::correlation::CorrelationId;
use crate::pending::PendingRequestStore;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Handler invoked once per inbound response message.
///
/// The transport owns the delivery context: [`handle`](Self::handle) is
/// non-blocking and safe to call concurrently across messages. Malformed
/// and unmatched responses are logged and dropped; nothing on this path is
/// ever raised to a caller, and there are no retries or dead-lettering.
#[derive(Clone)]
pub struct ResponseListener {
    store: Arc<PendingRequestStore>,
}

impl ResponseListener {
    pub(crate) fn new(store: Arc<PendingRequestStore>) -> Self {
        Self { store }
    }

    /// Handle one inbound message, unblocking the matching caller if one
    /// is still waiting.
    pub fn handle(&self, message: InboundMessage) {
        let raw = match message.correlation_id.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                warn!("received response without correlation id, dropping");
                return;
            }
        };

        let id = match CorrelationId::parse(raw) {
            Ok(id) => id,
            Err(_) => {
                warn!(
                    correlation_id = raw,
                    "received response with malformed correlation id, dropping"
                );
                return;
            }
        };

        debug!(correlation_id = %id, "received response");
        if !self.store.resolve(&id, message.body) {
            // Already timed out and evicted, or a duplicate delivery.
            warn!(correlation_id = %id, "no pending request for response, dropping");
        }
    }

    /// Pump a pull-style response channel, handling messages until it
    /// closes.
    pub async fn run(self, receiver: Arc<dyn ResponseReceiver>) {
        loop {
            match receiver.receive().await {
                Ok(message) => self.handle(message),
                Err(ChannelError::Closed) => {
                    warn!("response channel closed, stopping listener");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "error receiving response");
                }
            }
        }
    }
}
