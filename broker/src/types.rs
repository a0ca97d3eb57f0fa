//! Shared broker types: accounts, positions, balances, symbols, quotes, orders.

use std::fmt;

use qtbalance::{Price, Quantity, SharePrice, Side, Symbol};

/// Broker account number (e.g. "26598145").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountNumber(pub String);

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A brokerage account.
#[derive(Debug, Clone)]
pub struct Account {
    pub number: AccountNumber,
    /// Registration type, e.g. "TFSA", "RRSP", "Margin".
    pub account_type: String,
    pub status: String,
    pub is_primary: bool,
}

/// Broker-assigned numeric symbol identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u64);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A currently held position.
///
/// Market value and open P&L are zero when the broker omits them.
#[derive(Debug, Clone)]
pub struct Position {
    pub symbol: Symbol,
    pub symbol_id: SymbolId,
    /// Positive = long, negative = short.
    pub quantity: i64,
    pub current_price: SharePrice,
    pub market_value: Price,
    pub open_pnl: Price,
}

/// Balances for one currency of an account.
#[derive(Debug, Clone)]
pub struct Balance {
    /// ISO currency code, e.g. "CAD".
    pub currency: String,
    pub cash: Price,
    pub market_value: Price,
    pub total_equity: Price,
    pub buying_power: Price,
}

/// One result of a symbol search.
#[derive(Debug, Clone)]
pub struct SymbolMatch {
    pub symbol: Symbol,
    pub symbol_id: SymbolId,
    pub description: String,
    pub listing_exchange: String,
    pub currency: String,
}

/// Live quote for a symbol.
#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: Symbol,
    pub symbol_id: SymbolId,
    pub bid: Option<SharePrice>,
    pub ask: Option<SharePrice>,
    pub last: Option<SharePrice>,
    pub volume: u64,
}

impl Quote {
    /// Price used to size a purchase: the bid, or the last trade when the
    /// bid is missing or zero (e.g. outside market hours).
    pub fn reference_price(&self) -> Option<SharePrice> {
        self.bid
            .filter(|p| p.is_positive())
            .or_else(|| self.last.filter(|p| p.is_positive()))
    }
}

/// Order to submit to a broker.
#[derive(Debug, Clone)]
pub struct BrokerOrder {
    pub symbol: Symbol,
    pub symbol_id: SymbolId,
    pub side: Side,
    pub quantity: Quantity,
    pub order_type: BrokerOrderType,
}

/// Market or limit order. Both are day orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerOrderType {
    Market,
    Limit(SharePrice),
}

/// Opaque order ID returned by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub u64);
