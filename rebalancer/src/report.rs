//! Human-readable rendering of a rebalance plan.

use std::fmt;

use crate::diff::{HoldingEntry, NewEntry, RebalancePlan, TradeIntent};

impl fmt::Display for RebalancePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buying power:         {}", self.buying_power.reported)?;
        if let Some(spend) = self.buying_power.spend_override {
            writeln!(f, "Spend override:       {spend}")?;
        }
        writeln!(f, "Total position value: {}", self.total_position_value)?;
        writeln!(f, "Total P&L:            {}", self.total_pnl)?;
        writeln!(f, "Total assets:         {}", self.total_assets)?;

        if !self.holdings.is_empty() {
            writeln!(f, "\nHOLDINGS:")?;
            writeln!(
                f,
                "  {:10} {:>10} {:>8} {:>12} {:>12} {:>12}  Action",
                "Symbol", "Price", "Target", "Target $", "Actual $", "Diff"
            )?;
            for entry in &self.holdings {
                write_holding(f, entry)?;
            }
        }

        for symbol in &self.unallocated {
            writeln!(f, "{symbol} held but not in portfolio")?;
        }

        if !self.new_symbols.is_empty() {
            writeln!(f, "\nNEW:")?;
            for entry in &self.new_symbols {
                write_new(f, entry)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Total spent: {}", self.total_spent)?;
        writeln!(f, "Total sold:  {}", self.total_sold)?;
        write!(f, "Total diff:  {}", self.net)
    }
}

fn write_holding(f: &mut fmt::Formatter<'_>, entry: &HoldingEntry) -> fmt::Result {
    writeln!(
        f,
        "  {:10} {:>10} {:>7.2}% {:>12} {:>12} {:>12}  {}",
        entry.symbol,
        entry.price,
        entry.target_fraction * 100.0,
        entry.target_value,
        entry.actual_value,
        entry.difference(),
        action(entry.intent.as_ref()),
    )
}

fn write_new(f: &mut fmt::Formatter<'_>, entry: &NewEntry) -> fmt::Result {
    writeln!(f, "{} is new", entry.symbol)?;
    match entry.price {
        Some(price) => writeln!(
            f,
            "  price {price}, target {:.2}% = {}, {}",
            entry.target_fraction * 100.0,
            entry.target_value,
            action(entry.intent.as_ref()),
        ),
        None => writeln!(f, "  no price available"),
    }
}

fn action(intent: Option<&TradeIntent>) -> String {
    match intent {
        Some(i) => format!("could {} {}", i.side.action().to_lowercase(), i.quantity),
        None => "-".into(),
    }
}
