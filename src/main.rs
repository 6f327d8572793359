//! Command-line interface for batch-throughput
//!
//! # Usage Examples
//!
//! ```bash
//! # In-process run for 30 seconds (the default duration)
//! batch-throughput --local --para 4 --payload 1000 --batch-size 1000 --logfreq 1000000
//!
//! # Shorter local run with a JSON report
//! batch-throughput --local --duration 10s --output json
//!
//! # Long-lived worker until Ctrl+C, throttled to 1ms per record
//! batch-throughput --para 2 --delay 1 --ft
//! ```
//!
//! Set `RUST_LOG` to change log verbosity (default `info`).

use batch_throughput::{build_config, run_benchmark, spawn_shutdown_trigger};
use bench_runtime::{format_table, BenchArgs, OutputFormat};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "batch-throughput")]
#[command(about = "Throughput benchmark for a replayable batch source and a windowed rate sink")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: BenchArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (config, mode) = build_config(&cli.args)?;
    tracing::info!("Run mode: {:?}", mode);

    let shutdown = CancellationToken::new();
    spawn_shutdown_trigger(mode, shutdown.clone());

    let report = run_benchmark(config, cli.args.channel_capacity, shutdown).await?;

    match cli.args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => println!("{}", format_table(&report)),
    }

    Ok(())
}
