//! Command handlers.

pub mod agents;
pub mod auth;
pub mod commissions;
pub mod config;
pub mod dashboard;
pub mod debtors;
pub mod transactions;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use fieldledger_core::api::ApiClient;
use fieldledger_core::auth::{AuthManager, AuthPhase};
use fieldledger_core::config::Config;
use fieldledger_core::session::{AuthHeaders, FileSessionStore};

/// Builds the auth manager over the default session file.
fn auth_manager() -> AuthManager {
    AuthManager::new(Box::new(FileSessionStore::open_default()))
}

/// Restores the stored session and builds a client for the configured
/// backend. Fails with a login hint when no complete session exists.
fn connect(config: &Config) -> Result<(ApiClient, AuthHeaders)> {
    let mut auth = auth_manager();
    if auth.restore() != AuthPhase::Authenticated {
        anyhow::bail!("Not logged in. Run `fieldledger login` first.");
    }
    let client = ApiClient::new(config.resolve_backend_url()?);
    let headers = auth.headers()?;
    Ok((client, headers))
}

/// Parses a `YYYY-MM-DD` argument, defaulting to today when omitted.
fn parse_date_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|err| anyhow::anyhow!("Invalid date '{raw}': {err} (expected YYYY-MM-DD)")),
        None => Ok(Utc::now().date_naive()),
    }
}
