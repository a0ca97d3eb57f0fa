//! Questrade REST API client.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use super::auth::Session;
use super::types::{
    AccountsResponse, BalancesResponse, OrderRequest, OrderResponse, PositionsResponse,
    QuotesResponse, SymbolSearchResponse,
};
use crate::error::BrokerError;

/// Build the blocking HTTP client shared by login and API calls.
pub fn http_client(timeout: Duration) -> Result<Client, BrokerError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BrokerError::Connection(format!("failed to build HTTP client: {e}")))
}

/// Blocking Questrade REST client bound to one session.
pub struct QuestradeClient {
    http: Client,
    base_url: String,
    authorization: Zeroizing<String>,
}

impl QuestradeClient {
    pub fn new(http: Client, session: &Session) -> Self {
        Self {
            http,
            base_url: session.api_server().to_string(),
            authorization: session.authorization(),
        }
    }

    /// Absolute URL for an API path such as `v1/accounts`.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authenticated GET returning decoded JSON.
    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BrokerError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(path, request)
    }

    /// Authenticated POST with a JSON body, returning decoded JSON.
    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BrokerError> {
        let request = self.http.post(self.url(path)).json(body);
        self.send(path, request)
    }

    fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, BrokerError> {
        debug!("Questrade request: {path}");
        let resp = request
            .header(AUTHORIZATION, self.authorization.as_str())
            .send()
            .map_err(|e| BrokerError::Connection(format!("{path} request failed: {e}")))?;
        read_json(path, resp)
    }

    /// List accounts (GET v1/accounts).
    pub fn accounts(&self) -> Result<AccountsResponse, BrokerError> {
        self.get("v1/accounts", &[])
    }

    /// Positions for an account (GET v1/accounts/{id}/positions).
    pub fn positions(&self, account: &str) -> Result<PositionsResponse, BrokerError> {
        self.get(&format!("v1/accounts/{account}/positions"), &[])
    }

    /// Balances for an account (GET v1/accounts/{id}/balances).
    pub fn balances(&self, account: &str) -> Result<BalancesResponse, BrokerError> {
        self.get(&format!("v1/accounts/{account}/balances"), &[])
    }

    /// Search symbols by prefix (GET v1/symbols/search).
    pub fn search_symbols(&self, prefix: &str) -> Result<SymbolSearchResponse, BrokerError> {
        self.get("v1/symbols/search", &[("prefix", prefix)])
    }

    /// Level 1 quotes for a symbol id (GET v1/markets/quotes/{id}).
    pub fn quotes(&self, symbol_id: u64) -> Result<QuotesResponse, BrokerError> {
        self.get(&format!("v1/markets/quotes/{symbol_id}"), &[])
    }

    /// Place an order (POST v1/accounts/{id}/orders).
    pub fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, BrokerError> {
        let path = format!("v1/accounts/{}/orders", request.account_number);
        self.post(&path, request)
    }
}

/// Map a non-2xx status to `BrokerError::Http`, otherwise decode the body.
fn read_json<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, BrokerError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(BrokerError::Http {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    resp.json::<T>().map_err(|e| BrokerError::Decode {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}
