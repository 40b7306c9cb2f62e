//! Typed client for the field-agent ledger backend.
//!
//! The backend is a token-auth REST API under `/employees/...`. Sign-in
//! issues three headers (`access-token`, `client`, `uid`) which every
//! authenticated request must send back verbatim.
//!
//! List and record endpoints are historically inconsistent about envelopes:
//! `GET /employees/agents` may answer `{"agents": [...]}` or a bare array.
//! Both shapes are accepted here, in one place, so callers always see plain
//! typed values.

mod error;
pub mod types;

pub use error::{ClientError, ClientResult};

use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::session::AuthHeaders;
use types::{
    Agent, Commission, CommissionUpdate, DailyStats, DashboardSnapshot, Debtor, DebtorPayment,
    Employee, NewAgent, NewCommission, NewDebtor, NewTransaction, SignInRequest, Transaction,
};

/// HTTP client bound to one backend base URL.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given base URL. A trailing slash is trimmed
    /// so path concatenation stays predictable.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Builds a request with the three auth headers attached.
    fn authed(&self, method: Method, path: &str, auth: &AuthHeaders) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("access-token", &auth.access_token)
            .header("client", &auth.client)
            .header("uid", &auth.uid)
    }

    /// Sends a request and maps non-2xx responses to [`ClientError::Api`],
    /// keeping whatever body the backend sent.
    async fn execute(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "backend returned error status");
            return Err(ClientError::api(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Exchanges credentials for an auth header bundle.
    ///
    /// The profile in the response body is returned as well, but callers
    /// that need the canonical profile should follow up with
    /// [`validate_token`](Self::validate_token).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<(Employee, AuthHeaders)> {
        let request = self
            .http
            .post(self.url("/employees/sign_in"))
            .json(&SignInRequest { email, password });
        let response = self.execute(request).await?;
        let auth = auth_headers_from(&response)?;
        let body: Value = response.json().await?;
        let employee = decode_record(body, "data")?;
        Ok((employee, auth))
    }

    /// Asks the backend whether the token bundle is still valid and returns
    /// the canonical employee profile.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn validate_token(&self, auth: &AuthHeaders) -> ClientResult<Employee> {
        let body: Value = self
            .execute(self.authed(Method::GET, "/employees/validate_token", auth))
            .await?
            .json()
            .await?;
        decode_record(body, "data")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_agents(
        &self,
        auth: &AuthHeaders,
        employee_id: Option<u64>,
    ) -> ClientResult<Vec<Agent>> {
        let mut request = self.authed(Method::GET, "/employees/agents", auth);
        if let Some(id) = employee_id {
            request = request.query(&[("employee_id", id)]);
        }
        let body: Value = self.execute(request).await?.json().await?;
        decode_list(body, "agents")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_agent(&self, auth: &AuthHeaders, agent: &NewAgent) -> ClientResult<Agent> {
        let request = self
            .authed(Method::POST, "/employees/agents", auth)
            .json(agent);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "agent")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_transactions(
        &self,
        auth: &AuthHeaders,
        agent_id: Option<u64>,
    ) -> ClientResult<Vec<Transaction>> {
        let mut request = self.authed(Method::GET, "/employees/transactions", auth);
        if let Some(id) = agent_id {
            request = request.query(&[("agent_id", id)]);
        }
        let body: Value = self.execute(request).await?.json().await?;
        decode_list(body, "transactions")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_transaction(
        &self,
        auth: &AuthHeaders,
        transaction: &NewTransaction,
    ) -> ClientResult<Transaction> {
        let request = self
            .authed(Method::POST, "/employees/transactions", auth)
            .json(transaction);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "transaction")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_debtors(&self, auth: &AuthHeaders) -> ClientResult<Vec<Debtor>> {
        let body: Value = self
            .execute(self.authed(Method::GET, "/employees/debtors", auth))
            .await?
            .json()
            .await?;
        decode_list(body, "debtors")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_debtor(
        &self,
        auth: &AuthHeaders,
        debtor: &NewDebtor,
    ) -> ClientResult<Debtor> {
        let request = self
            .authed(Method::POST, "/employees/debtors", auth)
            .json(debtor);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "debtor")
    }

    /// Records a repayment and returns the debtor with updated totals.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn pay_debtor(
        &self,
        auth: &AuthHeaders,
        debtor_id: u64,
        payment: &DebtorPayment,
    ) -> ClientResult<Debtor> {
        let path = format!("/employees/debtors/{debtor_id}/payments");
        let request = self.authed(Method::POST, &path, auth).json(payment);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "debtor")
    }

    /// Lists commissions, optionally narrowed to a month and year.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_commissions(
        &self,
        auth: &AuthHeaders,
        month: Option<u32>,
        year: Option<i32>,
    ) -> ClientResult<Vec<Commission>> {
        let mut request = self.authed(Method::GET, "/employees/commissions", auth);
        if let Some(month) = month {
            request = request.query(&[("month", month)]);
        }
        if let Some(year) = year {
            request = request.query(&[("year", year)]);
        }
        let body: Value = self.execute(request).await?.json().await?;
        decode_list(body, "commissions")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_commission(
        &self,
        auth: &AuthHeaders,
        commission: &NewCommission,
    ) -> ClientResult<Commission> {
        let request = self
            .authed(Method::POST, "/employees/commissions", auth)
            .json(commission);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "commission")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn update_commission(
        &self,
        auth: &AuthHeaders,
        commission_id: u64,
        update: &CommissionUpdate,
    ) -> ClientResult<Commission> {
        let path = format!("/employees/commissions/{commission_id}");
        let request = self.authed(Method::PATCH, &path, auth).json(update);
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "commission")
    }

    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn delete_commission(
        &self,
        auth: &AuthHeaders,
        commission_id: u64,
    ) -> ClientResult<()> {
        let path = format!("/employees/commissions/{commission_id}");
        self.execute(self.authed(Method::DELETE, &path, auth))
            .await?;
        Ok(())
    }

    /// Fetches the dashboard snapshot, optionally scoped to one employee.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn dashboard(
        &self,
        auth: &AuthHeaders,
        employee_id: Option<u64>,
    ) -> ClientResult<DashboardSnapshot> {
        let mut request = self.authed(Method::GET, "/employees/dashboard", auth);
        if let Some(id) = employee_id {
            request = request.query(&[("employee_id", id)]);
        }
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "data")
    }

    /// Fetches per-day totals, defaulting to today when no date is given.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn daily_stats(
        &self,
        auth: &AuthHeaders,
        date: Option<NaiveDate>,
    ) -> ClientResult<DailyStats> {
        let mut request = self.authed(Method::GET, "/employees/dashboard/daily", auth);
        if let Some(date) = date {
            request = request.query(&[("date", date.format("%Y-%m-%d").to_string())]);
        }
        let body: Value = self.execute(request).await?.json().await?;
        decode_record(body, "data")
    }
}

/// Reads the three auth headers from a sign-in response.
///
/// Each header must be present and non-empty; the first one missing is
/// reported so the caller knows exactly what the backend dropped.
fn auth_headers_from(response: &Response) -> ClientResult<AuthHeaders> {
    let get = |name: &'static str| -> ClientResult<String> {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .ok_or(ClientError::AuthHeaderMissing(name))
    };
    Ok(AuthHeaders {
        access_token: get("access-token")?,
        client: get("client")?,
        uid: get("uid")?,
    })
}

/// Decodes a list that may arrive enveloped (`{"agents": [...]}`) or bare
/// (`[...]`). A missing or null key decodes to an empty list.
fn decode_list<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<Vec<T>> {
    let raw = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(value) => value,
        },
        other => {
            return Err(ClientError::validation(format!(
                "unexpected {key} payload: expected an array or object, got {other}"
            )));
        }
    };
    serde_json::from_value(raw)
        .map_err(|err| ClientError::validation(format!("unexpected {key} payload: {err}")))
}

/// Decodes a record that may arrive under `key` or as the bare object.
fn decode_record<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<T> {
    let raw = match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(value @ Value::Object(_)) => value,
            _ => Value::Object(map),
        },
        other => {
            return Err(ClientError::validation(format!(
                "unexpected {key} payload: expected an object, got {other}"
            )));
        }
    };
    serde_json::from_value(raw)
        .map_err(|err| ClientError::validation(format!("unexpected {key} payload: {err}")))
}
