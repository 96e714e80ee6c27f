//! # Relay API - Shared Text-Processing Contract
//!
//! Every relay backend processes text through the same interface: the
//! queue-backed processor (`relay-queue`) relays payloads to remote
//! workers over a message channel, and the multi-endpoint client
//! (`relay-endpoints`) posts them directly to a pool of HTTP endpoints.
//! Callers depend on this crate only.

pub mod error;
pub mod processor;

pub use error::ProcessorError;
pub use processor::TextProcessor;
