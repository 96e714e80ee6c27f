//! # Relay Endpoints - Direct Multi-Endpoint Text Processing
//!
//! The synchronous counterpart to the queue path: each `process` call
//! picks one endpoint from a fixed pool via the configured selection
//! strategy and posts the payload straight to it.
//!
//! ```text
//! caller ──► MultiEndpointClient ──► EndpointSelector::next()
//!                    │                        │
//!                    ▼                        ▼
//!              POST text/plain ──────► chosen endpoint
//! ```
//!
//! In contrast to the queue path's fail-open default, this path fails
//! closed: connection errors, non-success statuses, and timeouts
//! propagate to the caller, and there is no retry against a different
//! endpoint.

pub mod client;
pub mod config;
pub mod pool;
pub mod selector;

// Re-export main types
pub use client::MultiEndpointClient;
pub use config::ClientConfig;
pub use pool::{Endpoint, EndpointPool, SelectionError};
pub use selector::EndpointSelector;
