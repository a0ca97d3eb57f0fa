//! Broker trait and implementations for qtbalance.
//!
//! Provides a generic `Broker` trait over the handful of read endpoints the
//! rebalancer needs, plus order submission. Implementations:
//!
//! - **Questrade** (feature `questrade`): Questrade REST API with OAuth2
//!   refresh-token rotation
//! - **Mock** (always available): in-memory broker for tests

pub mod error;
pub mod mock;
pub mod types;

#[cfg(feature = "questrade")]
pub mod questrade;

pub use error::BrokerError;
pub use types::*;

/// A broker connection that can list accounts, fetch holdings and quotes,
/// and submit orders.
pub trait Broker {
    /// Connect (authenticate) to the broker.
    fn connect(&mut self) -> Result<(), BrokerError>;

    /// Disconnect gracefully.
    fn disconnect(&mut self) -> Result<(), BrokerError>;

    /// List all accounts visible to the authenticated user.
    fn accounts(&self) -> Result<Vec<Account>, BrokerError>;

    /// Get all positions held in an account.
    fn positions(&self, account: &AccountNumber) -> Result<Vec<Position>, BrokerError>;

    /// Get per-currency balances for an account.
    fn balances(&self, account: &AccountNumber) -> Result<Vec<Balance>, BrokerError>;

    /// Search symbols by prefix.
    fn search_symbols(&self, prefix: &str) -> Result<Vec<SymbolMatch>, BrokerError>;

    /// Get quotes for a symbol id.
    fn quotes(&self, id: SymbolId) -> Result<Vec<Quote>, BrokerError>;

    /// Submit an order. Returns the broker's order ID.
    fn submit_order(
        &self,
        account: &AccountNumber,
        order: &BrokerOrder,
    ) -> Result<OrderId, BrokerError>;
}
