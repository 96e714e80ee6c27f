//! Errors shared across processor implementations.

use thiserror::Error;

/// Failure surfaced by a processor.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// A direct endpoint call failed: connection error, non-success
    /// status, timeout, or an unreadable body.
    #[error("endpoint invocation failed: {0}")]
    EndpointInvocation(String),

    /// The processor could not be built from its configuration.
    #[error("processor configuration error: {0}")]
    Configuration(String),
}
