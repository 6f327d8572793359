//! Per-partition record of acknowledged batches, kept when fault tolerance is
//! enabled.

use crate::error::RuntimeError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Highest acknowledged batch id per generator partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchLedger {
    committed: BTreeMap<i32, i64>,
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `batch_id` as acknowledged for `partition`.
    ///
    /// # Errors
    ///
    /// Commits must be strictly increasing per partition; anything else
    /// returns [`RuntimeError::OutOfOrderCommit`].
    pub fn commit(&mut self, partition: i32, batch_id: i64) -> Result<(), RuntimeError> {
        if let Some(&last_committed) = self.committed.get(&partition) {
            if batch_id <= last_committed {
                return Err(RuntimeError::OutOfOrderCommit {
                    partition,
                    batch_id,
                    last_committed,
                });
            }
        }
        self.committed.insert(partition, batch_id);
        Ok(())
    }

    pub fn last_committed(&self, partition: i32) -> Option<i64> {
        self.committed.get(&partition).copied()
    }

    /// First batch id a restarted generator for `partition` should emit.
    pub fn resume_point(&self, partition: i32) -> i64 {
        self.last_committed(partition).map_or(1, |last| last + 1)
    }

    /// Committed batch ids keyed by partition.
    pub fn committed(&self) -> &BTreeMap<i32, i64> {
        &self.committed
    }
}
