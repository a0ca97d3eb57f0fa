//! Run orchestration: connect → fetch → price → compute → report.
//!
//! A run only reads from the broker. The plan is printed and nothing is
//! submitted.

use log::{info, warn};
use qtbalance::{Price, Symbol};
use qtbalance_broker::Broker;

use crate::broker;
use crate::config::Config;
use crate::diff::{self, BuyingPower, CurrentPosition, RebalancePlan};
use crate::error::{Error, Result};
use crate::target::TargetAllocation;

/// Options for a rebalance run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Whole-dollar amount to invest instead of the reported buying power.
    pub spend: Option<u64>,
    /// Print the plan as JSON instead of text.
    pub json: bool,
}

/// Fetch account state from `broker` and compute the rebalance plan.
///
/// Connects the broker first; for Questrade this rotates the refresh token.
pub fn build_plan(
    broker: &mut dyn Broker,
    config: &Config,
    targets: &TargetAllocation,
    spend: Option<u64>,
) -> Result<RebalancePlan> {
    broker.connect()?;
    let client: &dyn Broker = broker;

    let account = broker::single_account(client)?;
    let positions: Vec<CurrentPosition> = client
        .positions(&account.number)?
        .iter()
        .map(CurrentPosition::from)
        .collect();

    let balances = client.balances(&account.number)?;
    let reported = broker::buying_power(&balances, &config.account.currency)?;
    let buying_power =
        BuyingPower::new(reported).with_override(spend.map(Price::from_whole_dollars));
    if let Some(spend) = buying_power.spend_override {
        info!("Spending {spend} instead of reported buying power {reported}");
    }

    let unheld = unheld_targets(&positions, targets);
    let new_prices = broker::lookup_prices(client, &unheld)?;

    let plan = diff::compute_plan(&positions, buying_power, targets.targets(), &new_prices);
    for symbol in &plan.unallocated {
        warn!("{symbol} is held but not in the portfolio file");
    }
    info!(
        "Plan: {} trades, spend {}, sell {}",
        plan.intents().count(),
        plan.total_spent,
        plan.total_sold
    );
    Ok(plan)
}

/// Target symbols absent from the account's positions, in target order.
///
/// A symbol listed with zero market value is not looked up.
pub fn unheld_targets(positions: &[CurrentPosition], targets: &TargetAllocation) -> Vec<Symbol> {
    targets
        .targets()
        .iter()
        .map(|(s, _)| s)
        .filter(|s| !positions.iter().any(|p| &p.symbol == *s))
        .cloned()
        .collect()
}

/// Execute a full (read-only) rebalance run and print the result.
pub fn run(
    broker: &mut dyn Broker,
    config: &Config,
    targets: &TargetAllocation,
    opts: &RunOptions,
) -> Result<()> {
    info!(
        "Rebalancing toward {} targets ({:.2}% cash)",
        targets.len(),
        targets.cash_percent() * 100.0
    );

    let plan = build_plan(broker, config, targets, opts.spend)?;

    if opts.json {
        let json =
            serde_json::to_string_pretty(&plan).map_err(|e| Error::Output(e.to_string()))?;
        println!("{json}");
    } else {
        println!("{plan}");
    }

    if let Err(e) = broker.disconnect() {
        warn!("Disconnect failed: {e}");
    }
    Ok(())
}
