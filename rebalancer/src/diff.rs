//! CURRENT→TARGET diff engine.
//!
//! Computes hypothetical trades that move each holding toward its target
//! fraction of total assets. Pure: the caller fetches positions, balances and
//! prices; nothing here touches the network or submits orders.

use std::cmp::Ordering;

use log::{debug, warn};
use qtbalance::{Price, Quantity, SharePrice, Side, Symbol};
use qtbalance_broker::Position;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Current position snapshot from the broker (or test data).
#[derive(Debug, Clone)]
pub struct CurrentPosition {
    pub symbol: Symbol,
    pub current_price: SharePrice,
    pub market_value: Price,
    pub open_pnl: Price,
}

impl CurrentPosition {
    /// A position counts as held only while it has market value.
    pub fn is_held(&self) -> bool {
        self.market_value != Price::ZERO
    }
}

impl From<&Position> for CurrentPosition {
    fn from(p: &Position) -> Self {
        CurrentPosition {
            symbol: p.symbol.clone(),
            current_price: p.current_price,
            market_value: p.market_value,
            open_pnl: p.open_pnl,
        }
    }
}

/// Cash available to invest: the broker's figure, optionally capped by the user.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuyingPower {
    pub reported: Price,
    pub spend_override: Option<Price>,
}

impl BuyingPower {
    pub fn new(reported: Price) -> Self {
        Self {
            reported,
            spend_override: None,
        }
    }

    pub fn with_override(mut self, spend: Option<Price>) -> Self {
        self.spend_override = spend;
        self
    }

    /// The amount actually used in the computation.
    pub fn effective(&self) -> Price {
        self.spend_override.unwrap_or(self.reported)
    }
}

/// Whether a trade adjusts an existing holding or opens a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeKind {
    Rebalance,
    Initial,
}

/// A proposed (never submitted) trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeIntent {
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub price: SharePrice,
    pub kind: TradeKind,
}

impl TradeIntent {
    /// `price × quantity`, to the nearest cent.
    pub fn notional(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A held symbol that is part of the target allocation.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingEntry {
    pub symbol: Symbol,
    pub price: SharePrice,
    pub target_fraction: f64,
    /// Rounded to the cent for reporting. Trade sizes use the exact value.
    pub target_value: Price,
    pub actual_value: Price,
    pub intent: Option<TradeIntent>,
}

impl HoldingEntry {
    /// `actual − target`: positive when over-weight.
    pub fn difference(&self) -> Price {
        self.actual_value - self.target_value
    }
}

/// A target symbol absent from the account's positions.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntry {
    pub symbol: Symbol,
    /// `None` when no usable price was supplied.
    pub price: Option<SharePrice>,
    pub target_fraction: f64,
    /// Rounded to the cent for reporting.
    pub target_value: Price,
    pub intent: Option<TradeIntent>,
}

/// Full result of a rebalance computation.
#[derive(Debug, Clone, Serialize)]
pub struct RebalancePlan {
    pub buying_power: BuyingPower,
    pub total_position_value: Price,
    pub total_pnl: Price,
    pub total_assets: Price,
    pub holdings: Vec<HoldingEntry>,
    /// Held symbols absent from the targets. Never traded.
    pub unallocated: Vec<Symbol>,
    pub new_symbols: Vec<NewEntry>,
    pub total_spent: Price,
    pub total_sold: Price,
    /// `total_sold − total_spent`.
    pub net: Price,
}

impl RebalancePlan {
    /// All proposed trades, holdings first, then new symbols.
    pub fn intents(&self) -> impl Iterator<Item = &TradeIntent> {
        self.holdings
            .iter()
            .filter_map(|h| h.intent.as_ref())
            .chain(self.new_symbols.iter().filter_map(|n| n.intent.as_ref()))
    }

    pub fn is_balanced(&self) -> bool {
        self.intents().next().is_none()
    }

    fn record(&mut self, intent: &TradeIntent) {
        match intent.side {
            Side::Buy => self.total_spent += intent.notional(),
            Side::Sell => self.total_sold += intent.notional(),
        }
    }
}

/// Compute the rebalance plan.
///
/// # Arguments
/// - `positions`: current positions, in broker order
/// - `buying_power`: investable cash (reported, possibly overridden)
/// - `targets`: (symbol, fraction) pairs; fractions already validated
/// - `new_prices`: reference prices for target symbols absent from `positions`
///
/// Held symbols without a target are reported as unallocated and left alone.
/// A target listed among the positions with no market value is neither
/// rebalanced nor bought as new.
///
/// Share counts are `floor(gap / price)` on the unrounded target value
/// `total_assets × fraction`, so a gap just short of one share trades nothing.
pub fn compute_plan(
    positions: &[CurrentPosition],
    buying_power: BuyingPower,
    targets: &[(Symbol, f64)],
    new_prices: &[(Symbol, SharePrice)],
) -> RebalancePlan {
    let target_map: FxHashMap<&Symbol, f64> = targets.iter().map(|(s, f)| (s, *f)).collect();
    let price_map: FxHashMap<&Symbol, SharePrice> =
        new_prices.iter().map(|(s, p)| (s, *p)).collect();

    let total_position_value: Price = positions.iter().map(|p| p.market_value).sum();
    let total_pnl: Price = positions.iter().map(|p| p.open_pnl).sum();
    let total_assets = total_position_value + buying_power.effective();

    let mut plan = RebalancePlan {
        buying_power,
        total_position_value,
        total_pnl,
        total_assets,
        holdings: Vec::new(),
        unallocated: Vec::new(),
        new_symbols: Vec::new(),
        total_spent: Price::ZERO,
        total_sold: Price::ZERO,
        net: Price::ZERO,
    };

    // 1. Move held symbols toward target
    for pos in positions.iter().filter(|p| p.is_held()) {
        let Some(&fraction) = target_map.get(&pos.symbol) else {
            plan.unallocated.push(pos.symbol.clone());
            continue;
        };

        let target = total_assets.as_dollars() * fraction;
        let intent = if pos.current_price.is_positive() {
            rebalance_intent(pos, target)
        } else {
            warn!("{} has no usable price ({}); skipping", pos.symbol, pos.current_price);
            None
        };
        if let Some(ref i) = intent {
            plan.record(i);
        }

        plan.holdings.push(HoldingEntry {
            symbol: pos.symbol.clone(),
            price: pos.current_price,
            target_fraction: fraction,
            target_value: total_assets.scale(fraction),
            actual_value: pos.market_value,
            intent,
        });
    }

    // 2. Open targets the account has never listed
    let listed: FxHashSet<&Symbol> = positions.iter().map(|p| &p.symbol).collect();

    for (symbol, fraction) in targets {
        if listed.contains(symbol) {
            if !held_in(positions, symbol) {
                debug!("{symbol} is listed with no market value; skipping");
            }
            continue;
        }

        let target = total_assets.as_dollars() * fraction;
        let price = price_map.get(symbol).copied().filter(|p| p.is_positive());
        let intent = match price {
            Some(price) => initial_intent(symbol, price, target),
            None => {
                warn!("No price for new symbol {symbol}; skipping");
                None
            }
        };
        // Initial buys spend cash too, so they count toward the total. A
        // zero-share initial buy is dropped like any other zero-share trade.
        if let Some(ref i) = intent {
            plan.record(i);
        }

        plan.new_symbols.push(NewEntry {
            symbol: symbol.clone(),
            price,
            target_fraction: *fraction,
            target_value: total_assets.scale(*fraction),
            intent,
        });
    }

    plan.net = plan.total_sold - plan.total_spent;
    plan
}

fn held_in(positions: &[CurrentPosition], symbol: &Symbol) -> bool {
    positions.iter().any(|p| p.is_held() && &p.symbol == symbol)
}

/// Buy or sell whole shares to close the gap between actual and `target`
/// dollars.
///
/// Zero-share results are suppressed, as is an exact match.
fn rebalance_intent(pos: &CurrentPosition, target: f64) -> Option<TradeIntent> {
    let actual = pos.market_value.as_dollars();
    let (side, gap) = match target.partial_cmp(&actual)? {
        Ordering::Greater => (Side::Buy, target - actual),
        Ordering::Less => (Side::Sell, actual - target),
        Ordering::Equal => return None,
    };

    let quantity = pos.current_price.shares_for(gap);
    (quantity > 0).then(|| TradeIntent {
        symbol: pos.symbol.clone(),
        side,
        quantity,
        price: pos.current_price,
        kind: TradeKind::Rebalance,
    })
}

fn initial_intent(symbol: &Symbol, price: SharePrice, target: f64) -> Option<TradeIntent> {
    let quantity = price.shares_for(target);
    (quantity > 0).then(|| TradeIntent {
        symbol: symbol.clone(),
        side: Side::Buy,
        quantity,
        price,
        kind: TradeKind::Initial,
    })
}
