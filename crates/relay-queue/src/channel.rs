//! Transport ports for the queue path, plus in-memory adapters.
//!
//! This crate never opens connections. Callers construct the channel
//! handles (broker session, queue client, loopback pair) and hand them in:
//! an outbound [`RequestSender`] for the dispatcher, and - for transports
//! exposing a pull interface - an inbound [`ResponseReceiver`] driven by
//! [`ResponseListener::run`](crate::listener::ResponseListener::run).

use crate::correlation::CorrelationId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message sent on the request channel.
///
/// The body is the payload text; the correlation id is the single
/// metadata attribute, mirrored back by the worker on the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Request payload.
    pub body: String,
    /// Correlation attribute.
    pub correlation_id: CorrelationId,
}

impl OutboundMessage {
    /// Create a request message.
    pub fn new(body: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            body: body.into(),
            correlation_id,
        }
    }
}

/// Message delivered on the response channel.
///
/// The correlation attribute is set by the external worker and is not
/// trusted: it may be missing, empty, or not a valid id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Response payload.
    pub body: String,
    /// Correlation attribute as received.
    pub correlation_id: Option<String>,
}

impl InboundMessage {
    /// A well-formed reply to the request with the given id.
    pub fn reply(body: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            body: body.into(),
            correlation_id: Some(correlation_id.to_string()),
        }
    }
}

/// Channel error types.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Outbound channel handle supplied by the transport owner.
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Send a request message.
    async fn send(&self, message: OutboundMessage) -> Result<(), ChannelError>;
}

/// Inbound channel handle for transports exposing a pull interface.
#[async_trait]
pub trait ResponseReceiver: Send + Sync {
    /// Receive the next response (pending until one is available).
    async fn receive(&self) -> Result<InboundMessage, ChannelError>;
}

/// In-memory channel adapters backed by `tokio::sync::mpsc`.
///
/// Used throughout the test suites; also usable as a loopback transport
/// with an in-process worker.
pub mod memory {
    use super::*;
    use tokio::sync::{mpsc, Mutex};

    /// Sender half of an in-memory request channel.
    pub struct MemorySender(mpsc::Sender<OutboundMessage>);

    /// Receiver half of an in-memory response channel.
    pub struct MemoryReceiver(Mutex<mpsc::Receiver<InboundMessage>>);

    #[async_trait]
    impl RequestSender for MemorySender {
        async fn send(&self, message: OutboundMessage) -> Result<(), ChannelError> {
            self.0
                .send(message)
                .await
                .map_err(|_| ChannelError::Closed)
        }
    }

    #[async_trait]
    impl ResponseReceiver for MemoryReceiver {
        async fn receive(&self) -> Result<InboundMessage, ChannelError> {
            let mut guard = self.0.lock().await;
            guard.recv().await.ok_or(ChannelError::Closed)
        }
    }

    /// Create an in-memory request channel pair.
    pub fn request_channel(buffer: usize) -> (MemorySender, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (MemorySender(tx), rx)
    }

    /// Create an in-memory response channel pair.
    pub fn response_channel(buffer: usize) -> (mpsc::Sender<InboundMessage>, MemoryReceiver) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, MemoryReceiver(Mutex::new(rx)))
    }
}
