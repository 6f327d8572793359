//! Windowed throughput sink.

use crate::clock::{Clock, SystemClock};
use crate::metrics::{SinkReport, ThroughputSnapshot};
use bench_core::{BenchConfig, Record, RecordFunction};
use tracing::{debug, info};

/// Lifecycle of a sink instance. There is no terminal state; a sink measures
/// until the process shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Not yet prepared by the runtime.
    Uninitialized,
    /// Prepared, first record not seen yet.
    Warming,
    /// Window open, rates are measured from its start.
    Measuring,
}

/// Counts received records and periodically logs throughput.
///
/// One instance is fed sequentially by the runtime, so the counters need no
/// locking. Instances never share state; aggregate throughput is the sum of
/// what each instance reports.
pub struct ThroughputSink<C = SystemClock> {
    sink_id: usize,
    log_every_n_records: u64,
    record_size_bytes: u64,
    received: u64,
    /// Set once, on the first record
    window_start_ms: Option<i64>,
    prepared: bool,
    clock: C,
}

impl ThroughputSink<SystemClock> {
    /// Create a sink measuring against the wall clock.
    pub fn new(sink_id: usize, config: &BenchConfig) -> Self {
        Self::with_clock(sink_id, config, SystemClock)
    }
}

impl<C: Clock> ThroughputSink<C> {
    /// Create a sink measuring against `clock`.
    pub fn with_clock(sink_id: usize, config: &BenchConfig, clock: C) -> Self {
        Self {
            sink_id,
            log_every_n_records: config.log_every_n_records(),
            record_size_bytes: config.record_size_bytes(),
            received: 0,
            window_start_ms: None,
            prepared: false,
            clock,
        }
    }

    pub fn sink_id(&self) -> usize {
        self.sink_id
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Start of the measurement window, if a record has arrived.
    pub fn window_start_millis(&self) -> Option<i64> {
        self.window_start_ms
    }

    pub fn state(&self) -> SinkState {
        match (self.window_start_ms, self.prepared) {
            (Some(_), _) => SinkState::Measuring,
            (None, true) => SinkState::Warming,
            (None, false) => SinkState::Uninitialized,
        }
    }

    /// Observe one record.
    ///
    /// Returns the snapshot logged on this call, if any. The record's own
    /// payload size is not checked; volume is accounted from the configured
    /// record size.
    pub fn on_record(&mut self, _record: &Record) -> Option<ThroughputSnapshot> {
        let start = *self
            .window_start_ms
            .get_or_insert_with(|| self.clock.now_millis());
        self.received += 1;

        if self.received % self.log_every_n_records != 0 {
            return None;
        }

        let elapsed_secs = self.elapsed_secs_since(start);
        // Within the first second of the window: skip this tick.
        let snapshot =
            ThroughputSnapshot::compute(self.received, elapsed_secs, self.record_size_bytes)?;

        info!(
            sink = self.sink_id,
            received = snapshot.received,
            elapsed_secs = snapshot.elapsed_secs,
            elements_per_sec = snapshot.elements_per_sec,
            bytes_per_sec = snapshot.bytes_per_sec,
            gib_received = snapshot.gib_received,
            "Received {} elements since {}. Elements per second {}, GB received {}",
            snapshot.received,
            snapshot.elapsed_secs,
            snapshot.elements_per_sec,
            snapshot.gib_received,
        );

        Some(snapshot)
    }

    /// Summarise this instance as of now.
    pub fn report(&self) -> SinkReport {
        let elapsed_secs = self
            .window_start_ms
            .map(|start| self.elapsed_secs_since(start))
            .unwrap_or(0);
        SinkReport::new(
            self.sink_id,
            self.received,
            elapsed_secs,
            self.record_size_bytes,
        )
    }

    /// Whole seconds since `start`; a clock stepping backwards counts as 0.
    fn elapsed_secs_since(&self, start: i64) -> u64 {
        let elapsed_ms = self.clock.now_millis().saturating_sub(start).max(0);
        (elapsed_ms / 1000) as u64
    }
}

impl<C: Clock> RecordFunction for ThroughputSink<C> {
    fn prepare(&mut self) {
        self.prepared = true;
        debug!(sink = self.sink_id, "sink prepared");
    }

    fn execute(&mut self, record: &Record) {
        self.on_record(record);
    }

    fn cleanup(&mut self) {
        let report = self.report();
        info!(
            sink = report.sink_id,
            received = report.received,
            elapsed_secs = report.elapsed_secs,
            elements_per_sec = report.elements_per_sec,
            "sink finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use bench_core::{BenchSettings, RecordPayload};

    const T0: i64 = 1_700_000_000_000;

    fn test_config(log_every: i64, payload: i64) -> BenchConfig {
        BenchConfig::new(BenchSettings {
            payload_size_bytes: payload,
            log_every_n_records: log_every,
            ..BenchSettings::default()
        })
        .unwrap()
    }

    fn record(id: i64) -> Record {
        Record::new(id, 0, RecordPayload::zeroed(4))
    }

    fn test_sink(log_every: i64, payload: i64) -> (ThroughputSink<ManualClock>, ManualClock) {
        let clock = ManualClock::new(T0);
        let sink = ThroughputSink::with_clock(0, &test_config(log_every, payload), clock.clone());
        (sink, clock)
    }

    #[test]
    fn test_state_transitions() {
        let (mut sink, _clock) = test_sink(10, 0);
        assert_eq!(sink.state(), SinkState::Uninitialized);

        sink.prepare();
        assert_eq!(sink.state(), SinkState::Warming);
        assert_eq!(sink.window_start_millis(), None);

        sink.execute(&record(0));
        assert_eq!(sink.state(), SinkState::Measuring);
        assert_eq!(sink.window_start_millis(), Some(T0));
    }

    #[test]
    fn test_window_start_set_once() {
        let (mut sink, clock) = test_sink(1_000, 0);

        sink.on_record(&record(0));
        clock.advance_millis(5_000);
        sink.on_record(&record(1));

        assert_eq!(sink.window_start_millis(), Some(T0));
        assert_eq!(sink.received(), 2);
    }

    #[test]
    fn test_unprepared_sink_still_counts() {
        let (mut sink, _clock) = test_sink(10, 0);
        sink.on_record(&record(0));
        assert_eq!(sink.received(), 1);
        assert_eq!(sink.state(), SinkState::Measuring);
    }

    #[test]
    fn test_skips_tick_within_first_second() {
        let (mut sink, clock) = test_sink(10, 0);

        for i in 0..9 {
            assert_eq!(sink.on_record(&record(i)), None);
        }
        clock.advance_millis(999);
        // 10th record is a reporting tick, but the window is under a second old
        assert_eq!(sink.on_record(&record(9)), None);
        assert_eq!(sink.received(), 10);
    }

    #[test]
    fn test_reports_on_tick_after_first_second() {
        let (mut sink, clock) = test_sink(1_000, 0);

        sink.on_record(&record(0));
        for i in 1..999 {
            assert_eq!(sink.on_record(&record(i)), None);
        }
        clock.advance_millis(10_000);
        let snapshot = sink.on_record(&record(999)).unwrap();

        assert_eq!(snapshot.received, 1_000);
        assert_eq!(snapshot.elapsed_secs, 10);
        assert_eq!(snapshot.elements_per_sec, 100);
    }

    #[test]
    fn test_no_report_off_tick() {
        let (mut sink, clock) = test_sink(5, 0);

        sink.on_record(&record(0));
        clock.advance_millis(60_000);
        for i in 1..4 {
            assert_eq!(sink.on_record(&record(i)), None);
        }
        assert!(sink.on_record(&record(4)).is_some());
        assert_eq!(sink.on_record(&record(5)), None);
    }

    #[test]
    fn test_elapsed_seconds_floored() {
        let (mut sink, clock) = test_sink(2, 0);

        sink.on_record(&record(0));
        clock.advance_millis(1_999);
        let snapshot = sink.on_record(&record(1)).unwrap();
        assert_eq!(snapshot.elapsed_secs, 1);
        assert_eq!(snapshot.elements_per_sec, 2);
    }

    #[test]
    fn test_volume_uses_configured_record_size() {
        // payload 1000 + 12 bytes overhead, regardless of the record's own payload
        let (mut sink, clock) = test_sink(1_000_000, 1000);

        sink.on_record(&record(0));
        clock.advance_millis(1_000);
        let mut last = None;
        for i in 1..1_000_000 {
            last = sink.on_record(&record(i));
        }
        let snapshot = last.unwrap();
        assert_eq!(snapshot.received, 1_000_000);
        assert_eq!(snapshot.bytes_per_sec, 1_012_000_000);
        assert_eq!(snapshot.gib_received, 0);
    }

    #[test]
    fn test_clock_going_backwards_skips_tick() {
        let (mut sink, clock) = test_sink(2, 0);

        sink.on_record(&record(0));
        clock.advance_millis(-5_000);
        assert_eq!(sink.on_record(&record(1)), None);
    }

    #[test]
    fn test_report() {
        let (mut sink, clock) = test_sink(1_000_000, 88);
        assert_eq!(sink.report().received, 0);
        assert_eq!(sink.report().elapsed_secs, 0);

        for i in 0..500 {
            sink.on_record(&record(i));
        }
        clock.advance_millis(5_500);

        let report = sink.report();
        assert_eq!(report.sink_id, 0);
        assert_eq!(report.received, 500);
        assert_eq!(report.elapsed_secs, 5);
        assert_eq!(report.elements_per_sec, 100);
        assert_eq!(report.bytes_received, 50_000);
    }
}
