//! OAuth2 refresh-token exchange and single-use token rotation.
//!
//! Questrade refresh tokens are single use: every exchange returns a new one
//! and invalidates the old. The new token must be persisted before anything
//! else happens, or the next run cannot authenticate.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::blocking::Client;
use zeroize::Zeroizing;

use super::types::TokenResponse;
use crate::error::BrokerError;

/// Plaintext file holding the current refresh token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored refresh token, trimmed.
    pub fn load(&self) -> Result<Zeroizing<String>, BrokerError> {
        let raw = Zeroizing::new(fs::read_to_string(&self.path).map_err(|e| {
            BrokerError::TokenFile {
                path: self.path.clone(),
                source: e,
            }
        })?);
        let token = raw.trim();
        if token.is_empty() {
            return Err(BrokerError::EmptyToken(self.path.clone()));
        }
        Ok(Zeroizing::new(token.to_string()))
    }

    /// Replace the stored token.
    ///
    /// Writes a sibling `.tmp` file and renames it over the original, so an
    /// interrupted write leaves the previous token intact.
    pub fn save(&self, token: &str) -> Result<(), BrokerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(BrokerError::EmptyToken(self.path.clone()));
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let io_err = |e| BrokerError::TokenFile {
            path: self.path.clone(),
            source: e,
        };
        fs::write(&tmp, token).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!("Rotated refresh token saved to {}", self.path.display());
        Ok(())
    }
}

/// An authenticated API session.
pub struct Session {
    access_token: Zeroizing<String>,
    token_type: String,
    refresh_token: Zeroizing<String>,
    api_server: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a token response received at `now`.
    pub fn from_response(resp: TokenResponse, now: DateTime<Utc>) -> Self {
        let api_server = resp.api_server.trim_end_matches('/').to_string();
        Self {
            access_token: Zeroizing::new(resp.access_token),
            token_type: resp.token_type,
            refresh_token: Zeroizing::new(resp.refresh_token),
            api_server,
            expires_at: now + Duration::seconds(resp.expires_in),
        }
    }

    /// Value for the `Authorization` header, e.g. `Bearer abc123`.
    pub fn authorization(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{} {}", self.token_type, self.access_token.as_str()))
    }

    /// API base URL without a trailing slash.
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// The newly issued refresh token (to be persisted).
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"<redacted>")
            .field("api_server", &self.api_server)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint URL for a login server.
pub fn token_endpoint(login_url: &str) -> String {
    format!("{}/oauth2/token", login_url.trim_end_matches('/'))
}

/// Exchange a refresh token for an access token and API server.
///
/// No retry: a failed exchange is fatal to the run.
pub fn exchange_refresh_token(
    http: &Client,
    login_url: &str,
    refresh_token: &str,
) -> Result<Session, BrokerError> {
    let url = token_endpoint(login_url);
    info!("Exchanging refresh token at {url}");

    // The query string carries the token; keep it out of error messages.
    let resp = http
        .get(&url)
        .query(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .map_err(|e| BrokerError::Auth(format!("token request failed: {}", e.without_url())))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(BrokerError::Auth(format!(
            "token exchange returned {status}: {body}"
        )));
    }

    let token: TokenResponse = resp.json().map_err(|e| BrokerError::Decode {
        endpoint: "oauth2/token".into(),
        detail: e.without_url().to_string(),
    })?;

    let session = Session::from_response(token, Utc::now());
    info!(
        "Authenticated against {} (access token expires {})",
        session.api_server(),
        session.expires_at().format("%H:%M:%S UTC")
    );
    Ok(session)
}

/// Exchange the stored token and persist the rotated one.
///
/// The new refresh token is saved before the session is returned; if the
/// save fails the run must stop, since the old token is already spent.
pub fn login(http: &Client, login_url: &str, store: &TokenStore) -> Result<Session, BrokerError> {
    let refresh_token = store.load()?;
    let session = exchange_refresh_token(http, login_url, &refresh_token)?;
    store.save(session.refresh_token())?;
    Ok(session)
}
