//! Core types for the batch-throughput benchmark.
//!
//! This crate provides the foundational types shared by the generator,
//! the sink, and the in-process runtime:
//!
//! - [`Record`] - A single synthetic record `(id, partition_id, payload)`
//! - [`RecordPayload`] - Immutable fixed-size buffer shared by every record
//! - [`BenchConfig`] - Validated, process-wide benchmark configuration
//! - [`BenchError`] - Fatal configuration and contract errors
//! - [`BatchSource`] / [`RecordFunction`] - Contracts the runtime drives
//!
//! # Architecture
//!
//! ```text
//! bench-core (this crate)
//!    │
//!    ├─── batch-generator   (implements BatchSource)
//!    ├─── throughput-sink   (implements RecordFunction)
//!    └─── bench-runtime     (drives both over channels)
//! ```
//!
//! # Example
//!
//! ```rust
//! use bench_core::{BenchConfig, BenchSettings};
//!
//! let config = BenchConfig::new(BenchSettings {
//!     payload_size_bytes: 1000,
//!     batch_size: 500,
//!     ..BenchSettings::default()
//! })
//! .unwrap();
//!
//! assert_eq!(config.record_size_bytes(), 1012);
//! ```

pub mod config;
pub mod contract;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use config::{BenchConfig, BenchSettings};
pub use contract::{BatchSource, RecordFunction};
pub use error::BenchError;
pub use record::{Record, RecordPayload, DECLARED_FIELDS, RECORD_OVERHEAD_BYTES};
