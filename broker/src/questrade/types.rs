//! Questrade-specific API request and response types.

use qtbalance::{Price, SharePrice, Symbol};
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::types::{
    Account, AccountNumber, Balance, BrokerOrder, BrokerOrderType, Position, Quote, SymbolId,
    SymbolMatch,
};

/// OAuth2 token endpoint response.
///
/// ```json
/// {
///   "access_token": "C3lTUKuNQrAAmSD/TPjuV/HI7aNrAwDp",
///   "token_type": "Bearer",
///   "expires_in": 1800,
///   "refresh_token": "aSBe7wAAdx88QTbwut0tiu3SYic3ox8F",
///   "api_server": "https://api01.iq.questrade.com/"
/// }
/// ```
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub api_server: String,
}

/// `GET v1/accounts` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsResponse {
    pub accounts: Vec<AccountInfo>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

/// One account entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(rename = "type")]
    pub account_type: String,
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_billing: bool,
    #[serde(default)]
    pub client_account_type: String,
}

impl From<AccountInfo> for Account {
    fn from(info: AccountInfo) -> Self {
        Account {
            number: AccountNumber(info.number),
            account_type: info.account_type,
            status: info.status,
            is_primary: info.is_primary,
        }
    }
}

/// `GET v1/accounts/{id}/positions` response.
#[derive(Debug, Deserialize)]
pub struct PositionsResponse {
    pub positions: Vec<PositionInfo>,
}

/// One position entry. Value fields are `null` for some instruments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub symbol: String,
    pub symbol_id: u64,
    pub open_quantity: f64,
    pub current_market_value: Option<f64>,
    pub current_price: Option<f64>,
    pub average_entry_price: Option<f64>,
    pub closed_pnl: Option<f64>,
    pub open_pnl: Option<f64>,
}

impl TryFrom<PositionInfo> for Position {
    type Error = BrokerError;

    fn try_from(info: PositionInfo) -> Result<Self, Self::Error> {
        Ok(Position {
            symbol: Symbol::parse(&info.symbol)?,
            symbol_id: SymbolId(info.symbol_id),
            quantity: info.open_quantity.round() as i64,
            current_price: info
                .current_price
                .map(SharePrice::from_dollars)
                .transpose()?
                .unwrap_or(SharePrice::ZERO),
            market_value: money(info.current_market_value)?,
            open_pnl: money(info.open_pnl)?,
        })
    }
}

/// `GET v1/accounts/{id}/balances` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResponse {
    pub per_currency_balances: Vec<CurrencyBalance>,
    #[serde(default)]
    pub combined_balances: Vec<CurrencyBalance>,
}

/// Balances in one currency.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBalance {
    pub currency: String,
    pub cash: f64,
    pub market_value: f64,
    pub total_equity: f64,
    pub buying_power: f64,
    #[serde(default)]
    pub maintenance_excess: f64,
    #[serde(default)]
    pub is_real_time: bool,
}

impl TryFrom<CurrencyBalance> for Balance {
    type Error = BrokerError;

    fn try_from(b: CurrencyBalance) -> Result<Self, Self::Error> {
        Ok(Balance {
            currency: b.currency,
            cash: Price::from_dollars(b.cash)?,
            market_value: Price::from_dollars(b.market_value)?,
            total_equity: Price::from_dollars(b.total_equity)?,
            buying_power: Price::from_dollars(b.buying_power)?,
        })
    }
}

/// `GET v1/symbols/search` response.
#[derive(Debug, Deserialize)]
pub struct SymbolSearchResponse {
    pub symbols: Vec<SymbolSearchResult>,
}

/// One symbol search hit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSearchResult {
    pub symbol: String,
    pub symbol_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub security_type: String,
    #[serde(default)]
    pub listing_exchange: String,
    #[serde(default)]
    pub is_tradable: bool,
    #[serde(default)]
    pub is_quotable: bool,
    #[serde(default)]
    pub currency: String,
}

impl TryFrom<SymbolSearchResult> for SymbolMatch {
    type Error = BrokerError;

    fn try_from(s: SymbolSearchResult) -> Result<Self, Self::Error> {
        Ok(SymbolMatch {
            symbol: Symbol::parse(&s.symbol)?,
            symbol_id: SymbolId(s.symbol_id),
            description: s.description,
            listing_exchange: s.listing_exchange,
            currency: s.currency,
        })
    }
}

/// `GET v1/markets/quotes/{id}` response.
#[derive(Debug, Deserialize)]
pub struct QuotesResponse {
    pub quotes: Vec<QuoteInfo>,
}

/// One Level 1 quote. Prices are `null` when the market is closed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInfo {
    pub symbol: String,
    pub symbol_id: u64,
    pub bid_price: Option<f64>,
    pub ask_price: Option<f64>,
    pub last_trade_price: Option<f64>,
    #[serde(default)]
    pub volume: u64,
}

impl TryFrom<QuoteInfo> for Quote {
    type Error = BrokerError;

    fn try_from(q: QuoteInfo) -> Result<Self, Self::Error> {
        Ok(Quote {
            symbol: Symbol::parse(&q.symbol)?,
            symbol_id: SymbolId(q.symbol_id),
            bid: q.bid_price.map(SharePrice::from_dollars).transpose()?,
            ask: q.ask_price.map(SharePrice::from_dollars).transpose()?,
            last: q.last_trade_price.map(SharePrice::from_dollars).transpose()?,
            volume: q.volume,
        })
    }
}

/// `POST v1/accounts/{id}/orders` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub account_number: String,
    pub symbol_id: u64,
    pub quantity: u64,
    pub order_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
    pub time_in_force: &'static str,
    pub action: &'static str,
    pub primary_route: &'static str,
    pub secondary_route: &'static str,
    pub is_all_or_none: bool,
    pub is_anonymous: bool,
}

impl OrderRequest {
    pub fn new(account: &AccountNumber, order: &BrokerOrder) -> Self {
        let (order_type, limit_price) = match order.order_type {
            BrokerOrderType::Market => ("Market", None),
            BrokerOrderType::Limit(p) => ("Limit", Some(p.as_dollars())),
        };
        OrderRequest {
            account_number: account.0.clone(),
            symbol_id: order.symbol_id.0,
            quantity: order.quantity,
            order_type,
            limit_price,
            time_in_force: "Day",
            action: order.side.action(),
            primary_route: "AUTO",
            secondary_route: "AUTO",
            is_all_or_none: false,
            is_anonymous: false,
        }
    }
}

/// Order placement response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub orders: Vec<OrderInfo>,
}

/// One order entry in an order placement response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub id: u64,
    pub symbol: String,
    #[serde(default)]
    pub state: String,
}

impl OrderResponse {
    /// The placed order's id, from `orderId` or the first order entry.
    pub fn placed_id(&self) -> Option<u64> {
        self.order_id.or_else(|| self.orders.first().map(|o| o.id))
    }
}

/// Absent money fields count as zero.
fn money(value: Option<f64>) -> Result<Price, BrokerError> {
    match value {
        Some(v) => Ok(Price::from_dollars(v)?),
        None => Ok(Price::ZERO),
    }
}
