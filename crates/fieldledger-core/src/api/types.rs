//! Wire schemas for the field-agent ledger backend.
//!
//! Response models are deliberately tolerant: every field has a default and
//! amounts pass through [`crate::money::lenient_amount`], so a sparse or
//! junk-typed payload decodes to zeros instead of failing the whole list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Employee profile returned by sign-in and token validation.
///
/// Known fields are typed; anything else the backend sends rides along in
/// `extra` so a persisted session round-trips losslessly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field representative whose balances are tracked day to day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub id: u64,
    pub name: String,
    pub phone: String,
    /// Business line label, e.g. "`mobile_money`".
    pub type_of_agent: String,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub opening_balance: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub closing_balance: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// One day's float movement for an agent.
///
/// The closing balance relative to the opening balance decides whether the
/// day reads as a credit (money in) or a debit (money out).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub id: u64,
    pub agent_id: u64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub opening_balance: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub closing_balance: i64,
    pub notes: String,
    pub date: Option<NaiveDate>,
}

impl Transaction {
    /// True when the day ended at or above its opening balance.
    pub fn is_credit(&self) -> bool {
        self.closing_balance >= self.opening_balance
    }

    /// Absolute difference between closing and opening.
    pub fn amount_delta(&self) -> i64 {
        (self.closing_balance - self.opening_balance).abs()
    }
}

/// Someone who owes money, with running repayment totals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Debtor {
    pub id: u64,
    pub name: String,
    pub phone: String,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub balance_due: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub total_paid: i64,
    pub created_at: Option<DateTime<Utc>>,
    /// Name of the agent the debt is attributed to, when the backend knows it.
    pub agent_name: String,
}

/// A commission payout owed to an agent for a given month.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Commission {
    pub id: u64,
    pub agent_id: u64,
    pub agent_name: String,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub amount: i64,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub month: u32,
    pub year: i32,
}

/// Totals for a single day across all reporting agents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub total_opening: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub total_closing: i64,
    pub transactions_recorded: u64,
    pub agents_reporting: u64,
}

/// Headline numbers shown at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuickStats {
    pub active_agents: u64,
    pub total_debtors: u64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub outstanding_debt: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub collected_debt: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub commissions_this_month: i64,
}

/// Agent counts and combined float.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentsSummary {
    pub total: u64,
    pub active: u64,
    pub needs_update: u64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub combined_closing_balance: i64,
}

/// Debtor counts and debt totals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebtorsSummary {
    pub total: u64,
    pub high_severity: u64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub total_due: i64,
    #[serde(deserialize_with = "crate::money::lenient_amount")]
    pub total_paid: i64,
}

/// The dashboard payload, normalized once at the decode boundary.
///
/// Sections the backend omits decode to all-zero defaults, so rendering
/// code never branches on presence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSnapshot {
    pub daily: DailyStats,
    pub quick: QuickStats,
    pub agents: AgentsSummary,
    pub debtors: DebtorsSummary,
}

impl DashboardSnapshot {
    /// Share of debt recovered, in percent, over the quick stats.
    pub fn collection_rate(&self) -> f64 {
        crate::derive::collection_rate(self.quick.outstanding_debt, self.quick.collected_debt)
    }
}

/// Credentials payload for `POST /employees/sign_in`.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Payload for registering an agent.
#[derive(Debug, Clone, Serialize)]
pub struct NewAgent {
    pub name: String,
    pub phone: String,
    pub type_of_agent: String,
    pub opening_balance: i64,
}

/// Payload for recording a day's transaction.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub agent_id: u64,
    pub opening_balance: i64,
    pub closing_balance: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: NaiveDate,
}

/// Payload for registering a debtor.
#[derive(Debug, Clone, Serialize)]
pub struct NewDebtor {
    pub name: String,
    pub phone: String,
    pub balance_due: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

/// Payload for recording a repayment against a debtor.
#[derive(Debug, Clone, Serialize)]
pub struct DebtorPayment {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for creating a commission entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommission {
    pub agent_id: u64,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Partial update for a commission entry. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommissionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
