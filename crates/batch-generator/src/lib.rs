//! Batch generator for the batch-throughput benchmark.
//!
//! This crate provides the [`BatchGenerator`] which produces deterministic,
//! fixed-size batches of synthetic records. A batch is derived from its id
//! alone, so a replayed batch is identical to the original and the generator
//! never has to remember what it emitted.
//!
//! # Architecture
//!
//! ```text
//!   batch_id (1, 2, 3, ...)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  BatchGenerator  │
//! │                  │
//! │  - partition_id  │
//! │  - batch_size    │
//! │  - payload       │
//! └────────┬─────────┘
//!          │
//!          ▼
//!    Record { sequence_id, source_partition_id, payload }
//!    sequence ids: [(batch_id-1)*batch_size, batch_id*batch_size)
//! ```
//!
//! # Example
//!
//! ```rust
//! use batch_generator::BatchGenerator;
//!
//! let generator = BatchGenerator::new(100, 4, 7).unwrap();
//! let batch = generator.generate_batch(2).unwrap();
//!
//! let ids: Vec<i64> = batch.iter().map(|r| r.sequence_id).collect();
//! assert_eq!(ids, vec![4, 5, 6, 7]);
//! assert!(batch.iter().all(|r| r.source_partition_id == 7));
//! ```

pub mod generator;

// Re-exports for convenience
pub use generator::{BatchGenerator, BatchRecords};
