//! Questrade broker implementation.

pub mod auth;
pub mod client;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::Broker;
use crate::error::BrokerError;
use crate::types::*;
use auth::{Session, TokenStore};
use client::QuestradeClient;
use types::OrderRequest;

/// Questrade broker implementing the generic Broker trait.
///
/// Uses the REST API for all operations. Blocking (sync) via reqwest::blocking.
/// `connect()` spends the stored refresh token and persists its replacement.
pub struct QuestradeBroker {
    login_url: String,
    token_store: TokenStore,
    timeout: Duration,
    client: Option<QuestradeClient>,
}

impl QuestradeBroker {
    /// Create a new Questrade broker handle (not yet connected).
    pub fn new(login_url: &str, token_file: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            login_url: login_url.to_string(),
            token_store: TokenStore::new(token_file),
            timeout,
            client: None,
        }
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    fn require_client(&self) -> Result<&QuestradeClient, BrokerError> {
        self.client.as_ref().ok_or(BrokerError::NotConnected)
    }
}

impl Broker for QuestradeBroker {
    fn connect(&mut self) -> Result<(), BrokerError> {
        let http = client::http_client(self.timeout)?;
        let session: Session = auth::login(&http, &self.login_url, &self.token_store)?;
        self.client = Some(QuestradeClient::new(http, &session));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BrokerError> {
        self.client = None;
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<Account>, BrokerError> {
        let client = self.require_client()?;
        let resp = client.accounts()?;
        Ok(resp.accounts.into_iter().map(Account::from).collect())
    }

    fn positions(&self, account: &AccountNumber) -> Result<Vec<Position>, BrokerError> {
        let client = self.require_client()?;
        let resp = client.positions(&account.0)?;
        let positions = resp
            .positions
            .into_iter()
            .map(Position::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        info!("Fetched {} positions for account {account}", positions.len());
        Ok(positions)
    }

    fn balances(&self, account: &AccountNumber) -> Result<Vec<Balance>, BrokerError> {
        let client = self.require_client()?;
        let resp = client.balances(&account.0)?;
        resp.per_currency_balances
            .into_iter()
            .map(Balance::try_from)
            .collect()
    }

    fn search_symbols(&self, prefix: &str) -> Result<Vec<SymbolMatch>, BrokerError> {
        let client = self.require_client()?;
        let resp = client.search_symbols(prefix)?;
        resp.symbols.into_iter().map(SymbolMatch::try_from).collect()
    }

    fn quotes(&self, id: SymbolId) -> Result<Vec<Quote>, BrokerError> {
        let client = self.require_client()?;
        let resp = client.quotes(id.0)?;
        resp.quotes.into_iter().map(Quote::try_from).collect()
    }

    fn submit_order(
        &self,
        account: &AccountNumber,
        order: &BrokerOrder,
    ) -> Result<OrderId, BrokerError> {
        let client = self.require_client()?;
        if order.quantity == 0 {
            return Err(BrokerError::Order("quantity must be greater than zero".into()));
        }

        info!(
            "Submitting {} {} {} to account {account}",
            order.side, order.quantity, order.symbol
        );
        let resp = client.place_order(&OrderRequest::new(account, order))?;
        resp.placed_id()
            .map(OrderId)
            .ok_or_else(|| BrokerError::Order("order response carried no order id".into()))
    }
}
