//! Local topology: generator and sink tasks wired over bounded channels.

use crate::error::RuntimeError;
use crate::ledger::BatchLedger;
use crate::partitioner::FieldHashPartitioner;
use batch_generator::BatchGenerator;
use bench_core::{BatchSource, BenchConfig, BenchError, Record, RecordFunction};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use throughput_sink::{SinkReport, ThroughputSink};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default queue depth, in batch chunks, per sink.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

type SharedLedger = Arc<Mutex<BatchLedger>>;

/// What one generator task did before shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorReport {
    pub partition_id: i32,
    /// Number of batches fully emitted and acknowledged
    pub batches_emitted: u64,
    pub records_emitted: u64,
    /// Last acknowledged batch id, if any batch completed
    pub last_batch_id: Option<i64>,
}

/// Raw output of a topology run, before aggregation.
#[derive(Debug, Clone)]
pub struct TopologyReport {
    pub generators: Vec<GeneratorReport>,
    pub sinks: Vec<SinkReport>,
    /// Present when fault tolerance is enabled
    pub ledger: Option<BatchLedger>,
    pub wall_clock: Duration,
}

/// Runs `parallelism` generators and `parallelism` sinks in-process until
/// cancelled.
pub struct LocalTopology {
    config: BenchConfig,
    channel_capacity: usize,
    resume_from: Option<BatchLedger>,
}

impl LocalTopology {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            resume_from: None,
        }
    }

    /// Set the per-sink queue depth (clamped to at least 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Seed the batch ledger from an earlier run so each generator resumes
    /// after its last committed batch. Ignored unless fault tolerance is on.
    pub fn with_ledger(mut self, ledger: BatchLedger) -> Self {
        self.resume_from = Some(ledger);
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Generators always finish the batch in flight before stopping, so no
    /// partial batch is ever emitted. Sinks drain their queues once every
    /// generator has closed.
    pub async fn run(self, shutdown: CancellationToken) -> Result<TopologyReport, RuntimeError> {
        let started = Instant::now();
        let parallelism = self.config.parallelism();
        let partitioner = FieldHashPartitioner::new(parallelism)?;
        let ledger: Option<SharedLedger> = if self.config.fault_tolerance_enabled() {
            let seed = self.resume_from.unwrap_or_default();
            if !seed.committed().is_empty() {
                info!(committed = ?seed.committed(), "resuming from batch ledger");
            }
            Some(Arc::new(Mutex::new(seed)))
        } else {
            if self.resume_from.is_some() {
                debug!("fault tolerance disabled, ignoring batch ledger");
            }
            None
        };

        info!(
            parallelism,
            batch_size = self.config.batch_size(),
            payload_bytes = self.config.payload_size_bytes(),
            fault_tolerance = self.config.fault_tolerance_enabled(),
            "starting local topology"
        );

        let mut senders = Vec::with_capacity(parallelism);
        let mut sink_handles = Vec::with_capacity(parallelism);
        for sink_id in 0..parallelism {
            let (tx, rx) = mpsc::channel::<Vec<Record>>(self.channel_capacity);
            senders.push(tx);
            sink_handles.push(tokio::spawn(run_sink(sink_id, self.config.clone(), rx)));
        }

        let mut generator_tasks = JoinSet::new();
        for partition in 0..parallelism {
            let partition_id = i32::try_from(partition).map_err(|_| {
                BenchError::invalid_config(format!("para {parallelism} exceeds partition id range"))
            })?;
            let task = GeneratorTask {
                partition_id,
                config: self.config.clone(),
                partitioner,
                senders: senders.clone(),
                ledger: ledger.clone(),
                shutdown: shutdown.clone(),
            };
            generator_tasks.spawn(task.run());
        }
        // Sinks see end-of-stream once every generator has dropped its senders.
        drop(senders);

        let mut generators = Vec::with_capacity(parallelism);
        let mut first_error = None;
        while let Some(joined) = generator_tasks.join_next().await {
            match joined.map_err(RuntimeError::from).and_then(|result| result) {
                Ok(report) => generators.push(report),
                Err(e) => {
                    // The first failed generator stops the others.
                    shutdown.cancel();
                    first_error.get_or_insert(e);
                }
            }
        }
        generators.sort_by_key(|report| report.partition_id);

        let mut sinks = Vec::with_capacity(parallelism);
        for handle in sink_handles {
            sinks.push(handle.await?);
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let ledger = match ledger {
            Some(shared) => Some(
                shared
                    .lock()
                    .map_err(|_| RuntimeError::LedgerPoisoned)?
                    .clone(),
            ),
            None => None,
        };

        let wall_clock = started.elapsed();
        info!(
            wall_clock_ms = wall_clock.as_millis() as u64,
            "local topology stopped"
        );

        Ok(TopologyReport {
            generators,
            sinks,
            ledger,
            wall_clock,
        })
    }
}

/// One generator partition and everything it needs to emit.
struct GeneratorTask {
    partition_id: i32,
    config: BenchConfig,
    partitioner: FieldHashPartitioner,
    senders: Vec<mpsc::Sender<Vec<Record>>>,
    ledger: Option<SharedLedger>,
    shutdown: CancellationToken,
}

impl GeneratorTask {
    async fn run(self) -> Result<GeneratorReport, RuntimeError> {
        let mut generator = BatchGenerator::from_config(&self.config, self.partition_id);
        generator.open(self.partition_id);

        let mut report = GeneratorReport {
            partition_id: self.partition_id,
            batches_emitted: 0,
            records_emitted: 0,
            last_batch_id: None,
        };
        let mut batch_id = match &self.ledger {
            Some(ledger) => ledger
                .lock()
                .map_err(|_| RuntimeError::LedgerPoisoned)?
                .resume_point(self.partition_id),
            None => 1,
        };

        let result = self.emit_until_cancelled(&mut generator, &mut batch_id, &mut report).await;
        generator.close();
        debug!(
            partition = self.partition_id,
            batches = report.batches_emitted,
            records = report.records_emitted,
            "generator task finished"
        );
        result.map(|()| report)
    }

    async fn emit_until_cancelled(
        &self,
        generator: &mut BatchGenerator,
        batch_id: &mut i64,
        report: &mut GeneratorReport,
    ) -> Result<(), RuntimeError> {
        while !self.shutdown.is_cancelled() {
            let chunks = self.partitioner.split(generator.records(*batch_id)?);

            let mut emitted = 0u64;
            for (sink_id, chunk) in chunks.into_iter().enumerate() {
                if chunk.is_empty() {
                    continue;
                }
                emitted += chunk.len() as u64;
                self.senders[sink_id]
                    .send(chunk)
                    .await
                    .map_err(|_| RuntimeError::SinkClosed(sink_id))?;
            }

            if let Some(delay) = self.config.artificial_delay() {
                let throttle = delay.saturating_mul(u32::try_from(emitted).unwrap_or(u32::MAX));
                tokio::select! {
                    _ = tokio::time::sleep(throttle) => {}
                    _ = self.shutdown.cancelled() => {}
                }
            }

            generator.acknowledge(*batch_id);
            if let Some(ledger) = &self.ledger {
                ledger
                    .lock()
                    .map_err(|_| RuntimeError::LedgerPoisoned)?
                    .commit(self.partition_id, *batch_id)?;
            }

            report.batches_emitted += 1;
            report.records_emitted += emitted;
            report.last_batch_id = Some(*batch_id);
            *batch_id += 1;

            // Keep the scheduler fair when channels never fill up.
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

async fn run_sink(
    sink_id: usize,
    config: BenchConfig,
    mut rx: mpsc::Receiver<Vec<Record>>,
) -> SinkReport {
    let mut sink = ThroughputSink::new(sink_id, &config);
    sink.prepare();

    while let Some(chunk) = rx.recv().await {
        for record in &chunk {
            sink.execute(record);
        }
    }

    sink.cleanup();
    sink.report()
}
