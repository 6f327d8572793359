//! Aggregation of per-sink reports into a single run summary.

use crate::topology::{GeneratorReport, TopologyReport};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use throughput_sink::{SinkReport, BYTES_PER_GIB};

/// Summary of a whole benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedReport {
    /// Number of sink instances
    pub total_sinks: usize,
    /// Number of generator instances
    pub total_generators: usize,
    /// Records received across all sinks
    pub total_received: u64,
    /// Records emitted across all generators
    pub total_emitted: u64,
    /// Batches emitted across all generators
    pub total_batches: u64,
    /// Bytes received across all sinks, overhead included
    pub total_bytes: u64,
    /// Floored GiB received across all sinks
    pub total_gib: u64,
    /// Sum of per-sink element rates
    pub aggregate_elements_per_sec: u64,
    /// Sum of per-sink byte rates
    pub aggregate_bytes_per_sec: u64,
    /// Wall clock duration of the run
    pub wall_clock_duration_secs: f64,
    /// Per-sink details
    pub sinks: Vec<SinkReport>,
    /// Per-generator details
    pub generators: Vec<GeneratorReport>,
    /// Last acknowledged batch per partition (fault-tolerance mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed_batches: Option<BTreeMap<i32, i64>>,
    pub aggregated_at: DateTime<Utc>,
}

/// Combine a topology run into one report.
///
/// Sinks measure independently, so aggregate throughput is the sum of each
/// instance's own rate; instances that never completed a second contribute 0.
pub fn aggregate_reports(report: TopologyReport) -> AggregatedReport {
    let TopologyReport {
        generators,
        sinks,
        ledger,
        wall_clock,
    } = report;

    let total_received: u64 = sinks.iter().map(|s| s.received).sum();
    let total_bytes: u64 = sinks
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.bytes_received));
    let aggregate_elements_per_sec: u64 = sinks.iter().map(|s| s.elements_per_sec).sum();
    let aggregate_bytes_per_sec = sinks
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.bytes_per_sec()));

    AggregatedReport {
        total_sinks: sinks.len(),
        total_generators: generators.len(),
        total_received,
        total_emitted: generators.iter().map(|g| g.records_emitted).sum(),
        total_batches: generators.iter().map(|g| g.batches_emitted).sum(),
        total_bytes,
        total_gib: total_bytes / BYTES_PER_GIB,
        aggregate_elements_per_sec,
        aggregate_bytes_per_sec,
        wall_clock_duration_secs: wall_clock.as_secs_f64(),
        sinks,
        generators,
        committed_batches: ledger.map(|l| l.committed().clone()),
        aggregated_at: Utc::now(),
    }
}

/// Format aggregated report as a table.
pub fn format_table(report: &AggregatedReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Sink",
        "Received",
        "Elapsed",
        "Elements/sec",
        "Bytes/sec",
        "GiB",
    ]);

    for sink in &report.sinks {
        let rate_cell = if sink.elapsed_secs == 0 {
            Cell::new("-").fg(Color::Yellow)
        } else {
            Cell::new(format_number(sink.elements_per_sec))
        };

        table.add_row(vec![
            Cell::new(format!("sink-{}", sink.sink_id)),
            Cell::new(format_number(sink.received)),
            Cell::new(format!("{}s", sink.elapsed_secs)),
            rate_cell,
            Cell::new(format_bytes(sink.bytes_per_sec())),
            Cell::new(sink.gib_received),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(report.total_received)),
        Cell::new(format!(
            "{}*",
            format_duration(report.wall_clock_duration_secs)
        )),
        Cell::new(format!(
            "{}†",
            format_number(report.aggregate_elements_per_sec)
        )),
        Cell::new(format!("{}†", format_bytes(report.aggregate_bytes_per_sec))),
        Cell::new(report.total_gib),
    ]);

    output.push_str(&table.to_string());
    output.push_str("\n* Wall clock  † Sum of per-sink rates\n");
    output.push_str(&format!(
        "\nGenerators: {}  Batches: {}  Records emitted: {}\n",
        report.total_generators,
        format_number(report.total_batches),
        format_number(report.total_emitted)
    ));

    if let Some(ref committed) = report.committed_batches {
        output.push_str("\nCommitted batches:\n");
        for (partition, batch_id) in committed {
            output.push_str(&format!("  partition {partition}: batch {batch_id}\n"));
        }
    }

    output
}

/// Format duration in human-readable format.
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format a byte rate with a binary unit.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
