//! Registrar simulation binary.
//!
//! Loads a TOML configuration, runs the tick loop until the budget is spent
//! or a termination signal arrives, and records completed entities as CSV.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use registrar::{
    Config, CsvRecorder, Engine, LogWriter, Pipeline, StopReason, Subscribe, SubscriberSet,
    shutdown,
};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(about = "Tick-driven simulation of a bounded-capacity registration desk")]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "PATH", default_value = "config.toml")]
    config: PathBuf,

    /// RNG seed, overrides `generator.seed`
    #[arg(long)]
    seed: Option<u64>,

    /// CSV output path, overrides `file.output`
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of ticks, overrides `pipeline.tick_interval`
    #[arg(short, long)]
    ticks: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut cfg = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(seed) = cli.seed {
        cfg.generator.seed = Some(seed);
    }
    if let Some(output) = cli.output {
        cfg.file.output = output;
    }
    if let Some(ticks) = cli.ticks {
        cfg.pipeline.tick_interval = ticks;
    }

    let tick_delay = cfg.pipeline.tick_delay()?;
    let engine = Engine::from_config(&cfg)?;

    let mut subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    match CsvRecorder::create(&cfg.file.output).await {
        Ok(csv) => subs.push(Arc::new(csv)),
        Err(e) => tracing::error!(
            path = %cfg.file.output.display(),
            error = %e,
            "cannot create output file; completed entities will not be recorded"
        ),
    }

    let token = CancellationToken::new();
    let watcher = shutdown::cancel_on_signal(token.clone());

    let pipeline = Pipeline::new(
        engine,
        SubscriberSet::new(subs),
        cfg.pipeline.tick_interval,
        tick_delay,
    );
    let report = pipeline.run(token.clone()).await;

    token.cancel();
    let _ = watcher.await;

    let report = report?;
    tracing::info!(
        ticks = report.ticks,
        completed = report.completed_total,
        generated = report.engine.generated_total(),
        cancelled = report.reason == StopReason::Cancelled,
        output = %cfg.file.output.display(),
        "run complete"
    );
    Ok(())
}
