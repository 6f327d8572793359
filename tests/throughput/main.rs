//! Throughput benchmark integration tests.
//!
//! These tests exercise the generator -> partitioner -> sink workflow:
//! 1. Replayed batches are identical and route to the same sinks
//! 2. A short local run delivers every emitted record to exactly one sink
//! 3. The aggregated report sums what each sink measured

mod local_run;
mod replay;
