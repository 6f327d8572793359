//! Field-hash partitioning of the record stream.
//!
//! Records are routed by their sequence id, so a given id lands on the same
//! sink no matter how often its batch is replayed.

use bench_core::{BenchError, Record};

/// 2^64 / golden ratio, the splitmix64 increment.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stable 64-bit mix (splitmix64 finaliser).
fn mix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Assigns records to one of `partitions` sinks by hashing the sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHashPartitioner {
    partitions: usize,
}

impl FieldHashPartitioner {
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] when `partitions` is 0.
    pub fn new(partitions: usize) -> Result<Self, BenchError> {
        if partitions == 0 {
            return Err(BenchError::invalid_config(
                "at least one sink partition is required",
            ));
        }
        Ok(Self { partitions })
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Sink index for `sequence_id`.
    pub fn partition_for(&self, sequence_id: i64) -> usize {
        (mix64(sequence_id as u64) % self.partitions as u64) as usize
    }

    /// Split records into one chunk per sink, preserving arrival order within
    /// each chunk.
    pub fn split<I>(&self, records: I) -> Vec<Vec<Record>>
    where
        I: IntoIterator<Item = Record>,
    {
        let records = records.into_iter();
        let per_chunk = records.size_hint().0 / self.partitions + 1;
        let mut chunks: Vec<Vec<Record>> = (0..self.partitions)
            .map(|_| Vec::with_capacity(per_chunk))
            .collect();

        for record in records {
            let idx = self.partition_for(record.sequence_id);
            chunks[idx].push(record);
        }

        chunks
    }
}
