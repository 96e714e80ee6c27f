//! The processing contract.

use crate::error::ProcessorError;
use async_trait::async_trait;

/// A text processor: hand it a payload, get the processed text back.
///
/// Implementations differ in where the work happens and in their failure
/// policy. The queue-backed processor is fail-open: every call resolves
/// with a string, falling back to the unprocessed input when the remote
/// side does not answer in time. The multi-endpoint client is fail-closed:
/// invocation failures surface as [`ProcessorError`].
#[async_trait]
pub trait TextProcessor: Send + Sync {
    /// Process one payload.
    async fn process(&self, text: &str) -> Result<String, ProcessorError>;
}
