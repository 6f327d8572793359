//! Configuration helpers for the benchmark binary.

pub mod duration;

pub use duration::parse_duration;
