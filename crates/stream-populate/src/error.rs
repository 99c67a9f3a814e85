//! Error types for the populator.

use stream_store::StoreError;
use thiserror::Error;

/// Errors that end a populate run.
///
/// The stream loop itself only fails at startup; once running, store errors
/// are logged and absorbed. The seeder propagates them.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Store query or transport error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The store never became reachable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Rows could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
