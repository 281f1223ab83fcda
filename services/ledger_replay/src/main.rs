//! Ledger replay entry point

use anyhow::{Context, Result};
use clap::Parser;
use ledger_config::{LedgerConfig, LogConfig};
use ledger_replay::{bootstrap, load_script, report, run};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines operation script
    script: PathBuf,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    report: bool,
}

fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&log.level)
        .with_context(|| format!("Invalid log filter {:?}", log.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = LedgerConfig::load(args.config.as_deref())?;
    init_logging(&config.log)?;

    info!("Starting ledger replay");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut host = bootstrap(&config)?;
    let steps = load_script(&args.script)?;
    let summary = run(&mut host, &steps)?;
    info!(
        funded = summary.funded,
        committed = summary.committed,
        rejected = summary.rejected,
        "Replay finished"
    );

    let report = report(&host, summary)?;
    info!(
        total_liquidity = report.pool.total_liquidity,
        total_accrued_fees = report.pool.total_accrued_fees,
        fee_rate = ?report.fee_rate,
        "Final pool"
    );
    for reserve in &report.reserves {
        info!(reserve = %reserve, "Final reserve");
    }

    if args.report {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{json}");
    }
    Ok(())
}
