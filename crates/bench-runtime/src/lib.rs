//! In-process runtime for the batch-throughput benchmark.
//!
//! The benchmark's generator and sink are plain components; something has to
//! schedule them. This crate is that something when the benchmark runs on a
//! single machine: it plays the role a distributed stream runtime plays in a
//! cluster.
//!
//! ## Architecture
//!
//! ```text
//!  ┌────────────┐  ┌────────────┐        ┌────────────┐
//!  │ generator 0│  │ generator 1│  ...   │ generator N│   batch ids 1, 2, 3, ...
//!  └─────┬──────┘  └─────┬──────┘        └─────┬──────┘
//!        │  FieldHashPartitioner (by sequence id)│
//!        └──────────────┬┴──────────────────────┘
//!                       ▼   bounded mpsc, one per sink
//!  ┌────────────┐  ┌────────────┐        ┌────────────┐
//!  │   sink 0   │  │   sink 1   │  ...   │   sink N   │   logs throughput
//!  └─────┬──────┘  └─────┬──────┘        └─────┬──────┘
//!        └───────────────┼─────────────────────┘
//!                        ▼  on shutdown
//!               AggregatedReport (sum of per-sink rates)
//! ```
//!
//! With fault tolerance enabled, acknowledged batch ids are tracked per
//! partition in a [`BatchLedger`].

pub mod aggregator;
pub mod args;
pub mod error;
pub mod ledger;
pub mod partitioner;
pub mod topology;

pub use aggregator::{aggregate_reports, format_table, AggregatedReport};
pub use args::{BenchArgs, OutputFormat};
pub use error::RuntimeError;
pub use ledger::BatchLedger;
pub use partitioner::FieldHashPartitioner;
pub use topology::{GeneratorReport, LocalTopology, TopologyReport};
