//! Error types for the benchmark core.

use thiserror::Error;

/// Fatal errors raised while configuring or driving the benchmark.
///
/// Neither variant is recoverable locally: `InvalidConfig` aborts startup and
/// `InvalidBatchId` means the runtime broke the batch-id contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Negative payload size, non-positive batch size, and similar.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Batch id below 1, or one whose sequence range does not fit in an i64.
    #[error("Invalid batch id: {0}")]
    InvalidBatchId(i64),
}

impl BenchError {
    /// Shorthand for building an [`BenchError::InvalidConfig`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        BenchError::InvalidConfig(msg.into())
    }
}
