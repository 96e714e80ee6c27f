//! # Relay Queue - Queue-Backed Text Processing
//!
//! Relays each payload to remote workers over a one-way request channel
//! and matches the reply arriving on a separate response channel back to
//! the exact caller that issued it.
//!
//! ```text
//! caller ──► QueueProcessor ──► request channel ──► (external worker)
//!                 │                                        │
//!                 │ register(id)                           │
//!                 ▼                                        ▼
//!          PendingRequestStore ◄── ResponseListener ◄── response channel
//!                 │ resolve(id)
//!                 ▼
//! caller ◄── processed text (or the original payload after the timeout)
//! ```
//!
//! Replies may arrive out of order; correlation, not arrival order,
//! decides which caller is unblocked. The path is fail-open end to end:
//! send failures and timeouts hand the caller back the unprocessed input,
//! never an error.
//!
//! The store is owned by the processor instance and shared with its
//! listener at wiring time, so independent processor instances coexist
//! freely (there is no process-wide state).

pub mod channel;
pub mod config;
pub mod correlation;
pub mod listener;
pub mod pending;
pub mod processor;

// Re-export main types
pub use channel::{
    ChannelError, InboundMessage, OutboundMessage, RequestSender, ResponseReceiver,
};
pub use config::{QueueConfig, DEFAULT_RESPONSE_TIMEOUT};
pub use correlation::CorrelationId;
pub use listener::ResponseListener;
pub use pending::{PendingRequestStore, PendingStats, RegistryError};
pub use processor::QueueProcessor;
