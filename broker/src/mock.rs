//! Mock broker for testing: implements the `Broker` trait with configurable data.
//!
//! Use this in integration tests to simulate broker responses without network calls.
//!
//! ```
//! use qtbalance::{Price, SharePrice, Symbol};
//! use qtbalance_broker::mock::MockBroker;
//! use qtbalance_broker::Broker;
//!
//! let mut broker = MockBroker::builder()
//!     .with_account("26598145")
//!     .with_position(Symbol::new("XAW.TO"), 100, Price(40_00))
//!     .with_balance("CAD", Price(1_000_00))
//!     .with_symbol(Symbol::new("ZAG.TO"), Price(14_50))
//!     .build();
//! broker.connect().unwrap();
//! assert_eq!(broker.accounts().unwrap().len(), 1);
//! ```

use std::sync::Mutex;

use qtbalance::{Price, SharePrice, Symbol};

use crate::Broker;
use crate::error::BrokerError;
use crate::types::*;

/// A recorded order submission for assertion in tests.
#[derive(Clone, Debug)]
pub struct RecordedOrder {
    pub account: AccountNumber,
    pub order: BrokerOrder,
}

/// Builder for `MockBroker`.
pub struct MockBrokerBuilder {
    accounts: Vec<Account>,
    positions: Vec<Position>,
    balances: Vec<Balance>,
    symbols: Vec<(SymbolMatch, Quote)>,
    reject_orders: bool,
}

impl MockBrokerBuilder {
    pub fn with_account(mut self, number: &str) -> Self {
        self.accounts.push(Account {
            number: AccountNumber(number.to_string()),
            account_type: "TFSA".into(),
            status: "Active".into(),
            is_primary: self.accounts.is_empty(),
        });
        self
    }

    /// Add a position valued at `quantity × price`, with no open P&L.
    pub fn with_position(self, symbol: Symbol, quantity: i64, price: impl Into<SharePrice>) -> Self {
        let price = price.into();
        let value = price.times(quantity.unsigned_abs());
        let market_value = if quantity < 0 { Price::ZERO - value } else { value };
        self.with_raw_position(symbol, quantity, price, market_value, Price::ZERO)
    }

    /// Add a position with explicit market value and open P&L.
    pub fn with_raw_position(
        mut self,
        symbol: Symbol,
        quantity: i64,
        price: impl Into<SharePrice>,
        market_value: Price,
        open_pnl: Price,
    ) -> Self {
        let symbol_id = self.next_symbol_id();
        self.positions.push(Position {
            symbol,
            symbol_id,
            quantity,
            current_price: price.into(),
            market_value,
            open_pnl,
        });
        self
    }

    pub fn with_balance(mut self, currency: &str, buying_power: Price) -> Self {
        self.balances.push(Balance {
            currency: currency.to_string(),
            cash: buying_power,
            market_value: Price::ZERO,
            total_equity: buying_power,
            buying_power,
        });
        self
    }

    /// Register a searchable symbol whose quote has the given bid.
    pub fn with_symbol(self, symbol: Symbol, bid: impl Into<SharePrice>) -> Self {
        self.with_quote(symbol, Some(bid.into()), None)
    }

    /// Register a searchable symbol with an explicit bid and last trade price.
    pub fn with_quote(
        mut self,
        symbol: Symbol,
        bid: Option<SharePrice>,
        last: Option<SharePrice>,
    ) -> Self {
        let symbol_id = self.next_symbol_id();
        let matched = SymbolMatch {
            symbol: symbol.clone(),
            symbol_id,
            description: format!("{symbol} (mock)"),
            listing_exchange: "TSX".into(),
            currency: "CAD".into(),
        };
        let quote = Quote {
            symbol,
            symbol_id,
            bid,
            ask: None,
            last,
            volume: 0,
        };
        self.symbols.push((matched, quote));
        self
    }

    pub fn reject_orders(mut self, reject: bool) -> Self {
        self.reject_orders = reject;
        self
    }

    pub fn build(self) -> MockBroker {
        MockBroker {
            connected: false,
            accounts: self.accounts,
            positions: self.positions,
            balances: self.balances,
            symbols: self.symbols,
            reject_orders: self.reject_orders,
            submitted_orders: Mutex::new(Vec::new()),
        }
    }

    fn next_symbol_id(&self) -> SymbolId {
        SymbolId(1000 + (self.positions.len() + self.symbols.len()) as u64)
    }
}

/// A mock broker that records submitted orders and returns configured data.
pub struct MockBroker {
    connected: bool,
    accounts: Vec<Account>,
    positions: Vec<Position>,
    balances: Vec<Balance>,
    symbols: Vec<(SymbolMatch, Quote)>,
    reject_orders: bool,
    submitted_orders: Mutex<Vec<RecordedOrder>>,
}

impl MockBroker {
    pub fn builder() -> MockBrokerBuilder {
        MockBrokerBuilder {
            accounts: Vec::new(),
            positions: Vec::new(),
            balances: Vec::new(),
            symbols: Vec::new(),
            reject_orders: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Get all orders that were submitted (for assertion in tests).
    pub fn submitted_orders(&self) -> Vec<RecordedOrder> {
        self.submitted_orders
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }

    fn require_connected(&self) -> Result<(), BrokerError> {
        if self.connected {
            Ok(())
        } else {
            Err(BrokerError::NotConnected)
        }
    }

    fn require_account(&self, account: &AccountNumber) -> Result<(), BrokerError> {
        if self.accounts.iter().any(|a| &a.number == account) {
            Ok(())
        } else {
            Err(BrokerError::Http {
                endpoint: format!("v1/accounts/{account}"),
                status: 404,
                body: "account not found".into(),
            })
        }
    }
}

impl Broker for MockBroker {
    fn connect(&mut self) -> Result<(), BrokerError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BrokerError> {
        self.connected = false;
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, BrokerError> {
        self.require_connected()?;
        Ok(self.accounts.clone())
    }

    fn positions(&self, account: &AccountNumber) -> Result<Vec<Position>, BrokerError> {
        self.require_connected()?;
        self.require_account(account)?;
        Ok(self.positions.clone())
    }

    fn balances(&self, account: &AccountNumber) -> Result<Vec<Balance>, BrokerError> {
        self.require_connected()?;
        self.require_account(account)?;
        Ok(self.balances.clone())
    }

    fn search_symbols(&self, prefix: &str) -> Result<Vec<SymbolMatch>, BrokerError> {
        self.require_connected()?;
        Ok(self
            .symbols
            .iter()
            .filter(|(m, _)| m.symbol.as_str().starts_with(prefix))
            .map(|(m, _)| m.clone())
            .collect())
    }

    fn quotes(&self, id: SymbolId) -> Result<Vec<Quote>, BrokerError> {
        self.require_connected()?;
        Ok(self
            .symbols
            .iter()
            .filter(|(_, q)| q.symbol_id == id)
            .map(|(_, q)| q.clone())
            .collect())
    }

    fn submit_order(
        &self,
        account: &AccountNumber,
        order: &BrokerOrder,
    ) -> Result<OrderId, BrokerError> {
        self.require_connected()?;
        self.require_account(account)?;

        let mut submitted = self
            .submitted_orders
            .lock()
            .map_err(|_| BrokerError::Order("mock: order log poisoned".into()))?;
        submitted.push(RecordedOrder {
            account: account.clone(),
            order: order.clone(),
        });

        if self.reject_orders {
            return Err(BrokerError::Order("mock: order rejected".into()));
        }
        Ok(OrderId(submitted.len() as u64))
    }
}
