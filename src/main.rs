use anyhow::{Context, Result};
use clap::Parser;
use mad_db::cli::{BuildCommand, Cli};
use tracing_subscriber::EnvFilter;

/// Initialize tracing. RUST_LOG wins over `--log-level`; logs go to stderr.
fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let command = BuildCommand::new(cli.into_config());
    let report = command
        .execute()
        .await
        .context("MAD database generation failed")?;

    tracing::info!(
        mad_files = report.mad_files,
        sets = report.sets,
        rotations = report.rotations,
        backfilled = report.backfilled,
        digest = %report.digest,
        outcome = ?report.outcome,
        "Done"
    );

    Ok(())
}
