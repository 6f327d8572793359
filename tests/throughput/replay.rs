//! Replay integration test.
//!
//! Simulates a runtime that re-requests batches after a failure and checks
//! that the replayed output is identical and lands on the same sinks.

use batch_generator::BatchGenerator;
use bench_core::{BatchSource, BenchConfig, BenchSettings, Record, RecordFunction};
use bench_runtime::{BatchLedger, FieldHashPartitioner};
use std::collections::HashMap;
use throughput_sink::{ManualClock, ThroughputSink};

const PARTITIONS: usize = 4;
const BATCH_SIZE: i64 = 250;

fn test_config() -> BenchConfig {
    BenchConfig::new(BenchSettings {
        payload_size_bytes: 32,
        batch_size: BATCH_SIZE,
        log_every_n_records: 100,
        parallelism: PARTITIONS as i64,
        fault_tolerance_enabled: true,
        ..BenchSettings::default()
    })
    .expect("valid config")
}

/// Deliver one batch to the sinks and return where each record went.
fn deliver(
    generator: &BatchGenerator,
    batch_id: i64,
    partitioner: &FieldHashPartitioner,
    sinks: &mut [ThroughputSink<ManualClock>],
) -> HashMap<i64, usize> {
    let mut routes = HashMap::new();
    let chunks = partitioner.split(generator.records(batch_id).expect("valid batch id"));
    for (sink_id, chunk) in chunks.iter().enumerate() {
        for record in chunk {
            routes.insert(record.sequence_id, sink_id);
            sinks[sink_id].execute(record);
        }
    }
    routes
}

#[test]
fn test_replay_after_failure_is_identical() {
    let config = test_config();
    let mut ledger = BatchLedger::new();

    // First attempt: batches 1..=3 acknowledged, batch 4 emitted but "lost"
    let mut generator = BatchGenerator::from_config(&config, 0);
    generator.open(0);
    let mut emitted: Vec<Vec<Record>> = Vec::new();
    for batch_id in 1..=4 {
        emitted.push(generator.generate_batch(batch_id).unwrap());
        if batch_id < 4 {
            generator.acknowledge(batch_id);
            ledger.commit(0, batch_id).unwrap();
        }
    }
    generator.close();

    // Restart: a fresh instance resumes from the ledger
    let mut restarted = BatchGenerator::from_config(&config, 0);
    restarted.open(0);
    let resume = ledger.resume_point(0);
    assert_eq!(resume, 4);

    let replayed = restarted.generate_batch(resume).unwrap();
    assert_eq!(replayed, emitted[3]);

    // Earlier batches can be recomputed too, without any stored history
    for (idx, batch) in emitted.iter().enumerate() {
        assert_eq!(&restarted.generate_batch(idx as i64 + 1).unwrap(), batch);
    }
}

#[test]
fn test_replayed_records_route_to_same_sinks() {
    let config = test_config();
    let partitioner = FieldHashPartitioner::new(PARTITIONS).unwrap();
    let clock = ManualClock::new(0);
    let mut sinks: Vec<_> = (0..PARTITIONS)
        .map(|id| ThroughputSink::with_clock(id, &config, clock.clone()))
        .collect();
    for sink in &mut sinks {
        sink.prepare();
    }

    let generator = BatchGenerator::from_config(&config, 2);
    let first = deliver(&generator, 7, &partitioner, &mut sinks);
    let replay = deliver(&generator, 7, &partitioner, &mut sinks);

    assert_eq!(first.len(), BATCH_SIZE as usize);
    assert_eq!(first, replay);

    // The sinks count at-least-once: the replay is counted again
    let total: u64 = sinks.iter().map(|s| s.received()).sum();
    assert_eq!(total, 2 * BATCH_SIZE as u64);
}

#[test]
fn test_contiguous_sequence_across_batches() {
    let config = test_config();
    let generator = BatchGenerator::from_config(&config, 1);

    let mut all_ids = Vec::new();
    for batch_id in 1..=10 {
        all_ids.extend(
            generator
                .generate_batch(batch_id)
                .unwrap()
                .iter()
                .map(|r| r.sequence_id),
        );
    }

    let expected: Vec<i64> = (0..10 * BATCH_SIZE).collect();
    assert_eq!(all_ids, expected);
}
