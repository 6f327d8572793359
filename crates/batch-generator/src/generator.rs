//! Batch generator producing replayable record batches.

use bench_core::{BatchSource, BenchConfig, BenchError, Record, RecordPayload};
use std::ops::Range;
use tracing::debug;

/// Generator bound to one logical partition.
///
/// Holds nothing per batch: every batch is recomputed from its id, the
/// batch size, the partition id, and the shared payload buffer.
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    /// Partition this instance generates for
    partition_id: i32,
    /// Records per batch, kept signed for sequence arithmetic
    batch_size: i64,
    /// Zero-filled buffer attached to every record
    payload: RecordPayload,
}

impl BatchGenerator {
    /// Create a generator for `partition_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] if the payload size is negative
    /// or the batch size is below 1.
    pub fn new(
        payload_size_bytes: i64,
        batch_size: i64,
        partition_id: i32,
    ) -> Result<Self, BenchError> {
        let payload_len = usize::try_from(payload_size_bytes).map_err(|_| {
            BenchError::invalid_config(format!(
                "payload must not be negative, got {payload_size_bytes}"
            ))
        })?;
        if batch_size < 1 {
            return Err(BenchError::invalid_config(format!(
                "batchSize must be at least 1, got {batch_size}"
            )));
        }

        Ok(Self {
            partition_id,
            batch_size,
            payload: RecordPayload::zeroed(payload_len),
        })
    }

    /// Create a generator from an already validated configuration.
    pub fn from_config(config: &BenchConfig, partition_id: i32) -> Self {
        Self {
            partition_id,
            // Validated configs come from i64 settings, so this cannot truncate.
            batch_size: config.batch_size() as i64,
            payload: RecordPayload::zeroed(config.payload_size_bytes()),
        }
    }

    pub fn partition_id(&self) -> i32 {
        self.partition_id
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size as usize
    }

    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }

    /// Sequence ids covered by `batch_id`: `[(batch_id-1)*batch_size, batch_id*batch_size)`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidBatchId`] for ids below 1 or ids whose
    /// range would overflow an i64.
    pub fn sequence_range(&self, batch_id: i64) -> Result<Range<i64>, BenchError> {
        if batch_id < 1 {
            return Err(BenchError::InvalidBatchId(batch_id));
        }
        let start = (batch_id - 1)
            .checked_mul(self.batch_size)
            .ok_or(BenchError::InvalidBatchId(batch_id))?;
        let end = batch_id
            .checked_mul(self.batch_size)
            .ok_or(BenchError::InvalidBatchId(batch_id))?;
        Ok(start..end)
    }

    /// Lazily yield the records of `batch_id` in sequence order.
    pub fn records(&self, batch_id: i64) -> Result<BatchRecords<'_>, BenchError> {
        let range = self.sequence_range(batch_id)?;
        Ok(BatchRecords {
            generator: self,
            range,
        })
    }

    /// Materialise all records of `batch_id`.
    pub fn generate_batch(&self, batch_id: i64) -> Result<Vec<Record>, BenchError> {
        Ok(self.records(batch_id)?.collect())
    }
}

impl BatchSource for BatchGenerator {
    fn open(&mut self, partition_id: i32) {
        self.partition_id = partition_id;
        debug!(
            partition = partition_id,
            batch_size = self.batch_size,
            payload_bytes = self.payload.len(),
            "generator opened"
        );
    }

    fn generate_batch(&self, batch_id: i64) -> Result<Vec<Record>, BenchError> {
        BatchGenerator::generate_batch(self, batch_id)
    }

    fn acknowledge(&mut self, _batch_id: i64) {
        // Nothing is retained per batch, so there is nothing to release.
    }

    fn close(&mut self) {
        debug!(partition = self.partition_id, "generator closed");
    }
}

/// Iterator over the records of a single batch.
pub struct BatchRecords<'a> {
    generator: &'a BatchGenerator,
    range: Range<i64>,
}

impl Iterator for BatchRecords<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let sequence_id = self.range.next()?;
        Some(Record::new(
            sequence_id,
            self.generator.partition_id,
            self.generator.payload.clone(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for BatchRecords<'_> {}
