//! Contracts between the benchmark components and the runtime that drives them.

use crate::error::BenchError;
use crate::record::{Record, DECLARED_FIELDS};

/// A replayable batch source, driven one partition at a time.
///
/// The runtime never calls a single instance concurrently, so implementors
/// need no internal synchronisation.
pub trait BatchSource {
    /// Bind the runtime-assigned partition id before the first batch.
    fn open(&mut self, partition_id: i32);

    /// Materialise the records of `batch_id`.
    ///
    /// Must be a pure function of the batch id and the instance's fixed
    /// configuration: the runtime may ask for the same id again after a
    /// failure and expects identical output.
    fn generate_batch(&self, batch_id: i64) -> Result<Vec<Record>, BenchError>;

    /// Called once the runtime considers `batch_id` fully processed.
    fn acknowledge(&mut self, batch_id: i64);

    fn close(&mut self);

    /// Names of the fields every emitted record carries, in order.
    fn declared_fields(&self) -> &'static [&'static str] {
        &DECLARED_FIELDS
    }
}

/// A per-record function applied to the partitioned stream.
pub trait RecordFunction {
    fn prepare(&mut self);

    fn execute(&mut self, record: &Record);

    fn cleanup(&mut self);
}
