//! Error types for store access.

use thiserror::Error;

/// Errors returned by [`crate::Store`] operations.
///
/// Callers in the stream loop treat every variant as a transient failure;
/// the message is what ends up in the log.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport error, including request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("query failed with status {status}: {body}")]
    Query { status: u16, body: String },

    /// A scalar result could not be parsed.
    #[error("unexpected response '{0}'")]
    Parse(String),

    /// Rows could not be serialized for a bulk insert.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store does not support the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Failure injected by the in-memory store.
    #[error("injected failure: {0}")]
    Injected(String),
}
