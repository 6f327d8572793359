//! Error types for the in-process runtime.

use bench_core::BenchError;
use thiserror::Error;

/// Errors that can stop a benchmark run.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration or batch-id contract violation.
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// A sink stopped receiving while generators were still emitting.
    #[error("Sink {0} closed its input channel")]
    SinkClosed(usize),

    /// A generator or sink task panicked or was aborted.
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// A batch was acknowledged out of order.
    #[error("Out-of-order commit on partition {partition}: batch {batch_id} after {last_committed}")]
    OutOfOrderCommit {
        partition: i32,
        batch_id: i64,
        last_committed: i64,
    },

    /// A task panicked while holding the batch ledger.
    #[error("Batch ledger lock poisoned")]
    LedgerPoisoned,
}
