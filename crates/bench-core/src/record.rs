//! Record and payload types.

use std::fmt;
use std::sync::Arc;

/// Serialized size of the non-payload fields: 8-byte id + 4-byte partition id.
pub const RECORD_OVERHEAD_BYTES: u64 = 8 + 4;

/// Field names a generator declares to the runtime, in emission order.
pub const DECLARED_FIELDS: [&str; 3] = ["id", "partitionId", "payload"];

/// Immutable fixed-size byte buffer shared by every generated record.
///
/// Cloning is a reference-count bump, so a generator can stamp the same
/// buffer onto millions of records without copying it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecordPayload(Arc<[u8]>);

impl RecordPayload {
    /// Create a zero-filled payload of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0u8; len].into())
    }

    /// Wrap existing bytes. Used by tests and by runtimes that hand the sink
    /// records they did not generate themselves.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether two payloads share the same underlying allocation.
    pub fn ptr_eq(&self, other: &RecordPayload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RecordPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordPayload({} bytes)", self.0.len())
    }
}

/// A single synthetic record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// Offset of this record in its partition's batch sequence.
    pub sequence_id: i64,
    /// Partition id of the generator instance that produced the record.
    pub source_partition_id: i32,
    /// Shared payload buffer.
    pub payload: RecordPayload,
}

impl Record {
    pub fn new(sequence_id: i64, source_partition_id: i32, payload: RecordPayload) -> Self {
        Self {
            sequence_id,
            source_partition_id,
            payload,
        }
    }

    /// Bytes this record occupies on the wire, overhead included.
    pub fn serialized_size(&self) -> u64 {
        RECORD_OVERHEAD_BYTES + self.payload.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_payload() {
        let payload = RecordPayload::zeroed(16);
        assert_eq!(payload.len(), 16);
        assert!(payload.as_bytes().iter().all(|b| *b == 0));
        assert!(!payload.is_empty());
        assert!(RecordPayload::zeroed(0).is_empty());
    }

    #[test]
    fn test_payload_clone_shares_buffer() {
        let payload = RecordPayload::zeroed(1024);
        let cloned = payload.clone();
        assert!(payload.ptr_eq(&cloned));

        // Equal content, different allocation
        let other = RecordPayload::zeroed(1024);
        assert_eq!(payload, other);
        assert!(!payload.ptr_eq(&other));
    }

    #[test]
    fn test_record_serialized_size() {
        let record = Record::new(7, 3, RecordPayload::zeroed(1000));
        assert_eq!(record.serialized_size(), 1012);

        let empty = Record::new(0, 0, RecordPayload::zeroed(0));
        assert_eq!(empty.serialized_size(), RECORD_OVERHEAD_BYTES);
    }

    #[test]
    fn test_payload_debug_hides_bytes() {
        let payload = RecordPayload::from_bytes(vec![1u8, 2, 3]);
        assert_eq!(format!("{payload:?}"), "RecordPayload(3 bytes)");
    }
}
