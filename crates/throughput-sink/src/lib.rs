//! Throughput measurement sink for the batch-throughput benchmark.
//!
//! [`ThroughputSink`] counts the records routed to it and, every
//! `log_every_n_records` records, logs a [`ThroughputSnapshot`] with the
//! elapsed time since its first record, the element rate, and the cumulative
//! volume. Ticks that land within the first second of the window are skipped
//! rather than reporting an undefined rate.
//!
//! Time comes from a [`Clock`] so the measurement can be driven
//! deterministically in tests with a [`ManualClock`].

pub mod clock;
pub mod metrics;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use metrics::{SinkReport, ThroughputSnapshot, BYTES_PER_GIB};
pub use sink::{SinkState, ThroughputSink};
