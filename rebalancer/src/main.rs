//! CLI entry point for the qtbalance rebalancer.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use qtbalance_rebalancer::broker;
use qtbalance_rebalancer::config::Config;
use qtbalance_rebalancer::error::Error;
use qtbalance_rebalancer::execution::{self, RunOptions};
use qtbalance_rebalancer::target::TargetAllocation;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Compute the trades that rebalance a Questrade account (never places orders)")]
#[command(version)]
struct Cli {
    /// Whole dollars to invest instead of the account's buying power
    spend: Option<u64>,

    /// Path to config.toml (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to portfolio.json (overrides the config file)
    #[arg(long)]
    portfolio: Option<PathBuf>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match error_report(&e) {
            (line, true) => println!("{line}"),
            (line, false) => eprintln!("{line}"),
        }
        process::exit(1);
    }
}

/// The line printed for a fatal error, and whether it goes to stdout.
fn error_report(e: &Error) -> (String, bool) {
    match e {
        Error::Allocation { .. } => ("Cannot have total portfolio percent over 1!".to_string(), true),
        _ => (format!("Error: {e}"), false),
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Validated before connecting so a bad file never spends the token
    let portfolio = cli.portfolio.as_ref().unwrap_or(&config.portfolio.file);
    let targets = TargetAllocation::load(portfolio)?;

    let mut questrade = broker::questrade(&config);
    let opts = RunOptions {
        spend: cli.spend,
        json: cli.json,
    };
    execution::run(&mut questrade, &config, &targets, &opts)
}
