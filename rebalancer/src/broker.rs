//! Broker queries used by a rebalance run.
//!
//! Thin helpers over the generic [`Broker`] trait that enforce the run's
//! expectations (one account, a balance in the configured currency, an
//! unambiguous symbol lookup) and turn violations into rebalancer errors.

use log::{debug, info};
use qtbalance::{Price, SharePrice, Symbol};
use qtbalance_broker::questrade::QuestradeBroker;
use qtbalance_broker::{Account, Balance, Broker};

use crate::config::Config;
use crate::error::{Error, Result};

/// Build the Questrade broker described by the config (not yet connected).
pub fn questrade(config: &Config) -> QuestradeBroker {
    QuestradeBroker::new(
        &config.auth.login_url,
        &config.auth.token_file,
        config.timeout(),
    )
}

/// The one account visible to the user. Zero or several is an error.
pub fn single_account(broker: &dyn Broker) -> Result<Account> {
    let mut accounts = broker.accounts()?;
    if accounts.len() != 1 {
        return Err(Error::AccountCount(accounts.len()));
    }
    let account = accounts.remove(0);
    info!(
        "Using account {} ({}, {})",
        account.number, account.account_type, account.status
    );
    Ok(account)
}

/// Buying power reported for `currency`.
pub fn buying_power(balances: &[Balance], currency: &str) -> Result<Price> {
    balances
        .iter()
        .find(|b| b.currency.eq_ignore_ascii_case(currency))
        .map(|b| b.buying_power)
        .ok_or_else(|| Error::MissingCurrency(currency.to_string()))
}

/// Reference price of a symbol that is not currently held.
///
/// The prefix search must return exactly one match and its quote lookup
/// exactly one quote.
pub fn lookup_price(broker: &dyn Broker, symbol: &Symbol) -> Result<SharePrice> {
    let lookup_err = |detail: String| Error::SymbolLookup {
        symbol: symbol.to_string(),
        detail,
    };

    let matches = broker.search_symbols(symbol.as_str())?;
    let [found] = matches.as_slice() else {
        return Err(lookup_err(format!(
            "expected 1 search result, got {}",
            matches.len()
        )));
    };

    let quotes = broker.quotes(found.symbol_id)?;
    let [quote] = quotes.as_slice() else {
        return Err(lookup_err(format!(
            "expected 1 quote for id {}, got {}",
            found.symbol_id,
            quotes.len()
        )));
    };

    let price = quote
        .reference_price()
        .ok_or_else(|| lookup_err("quote has no bid or last price".into()))?;
    debug!("{symbol} (id {}) priced at {price}", found.symbol_id);
    Ok(price)
}

/// Prices for every symbol in `symbols`, in order.
pub fn lookup_prices(
    broker: &dyn Broker,
    symbols: &[Symbol],
) -> Result<Vec<(Symbol, SharePrice)>> {
    symbols
        .iter()
        .map(|s| lookup_price(broker, s).map(|p| (s.clone(), p)))
        .collect()
}
