//! Pure derivations over fetched ledger data.
//!
//! Everything here is computed client-side from lists the backend returns:
//! debt severity tiers, agent activity status, latest balances per agent,
//! search filtering, and sort orders. No function in this module performs IO.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::types::{Debtor, Transaction};

/// Balances above this (exclusive) are at least medium severity.
pub const MEDIUM_DEBT_THRESHOLD: i64 = 500_000;

/// Balances above this (exclusive) are high severity.
pub const HIGH_DEBT_THRESHOLD: i64 = 1_000_000;

/// Debt tier for a debtor's outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtSeverity {
    High,
    Medium,
    Low,
}

impl DebtSeverity {
    /// Classifies an outstanding balance. Bounds are exclusive: exactly
    /// 1,000,000 is medium and exactly 500,000 is low.
    pub fn classify(balance_due: i64) -> Self {
        if balance_due > HIGH_DEBT_THRESHOLD {
            DebtSeverity::High
        } else if balance_due > MEDIUM_DEBT_THRESHOLD {
            DebtSeverity::Medium
        } else {
            DebtSeverity::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebtSeverity::High => "high",
            DebtSeverity::Medium => "medium",
            DebtSeverity::Low => "low",
        }
    }
}

/// Whether an agent's books look current.
///
/// An agent whose latest closing balance is positive is considered active;
/// zero or negative means the agent has not reported a usable balance and
/// needs a fresh entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Active,
    NeedsUpdate,
}

impl AgentStatus {
    pub fn from_closing_balance(closing: i64) -> Self {
        if closing > 0 {
            AgentStatus::Active
        } else {
            AgentStatus::NeedsUpdate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::NeedsUpdate => "needs update",
        }
    }
}

/// Opening/closing pair taken from an agent's most recent transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalancePair {
    pub opening: i64,
    pub closing: i64,
}

impl BalancePair {
    pub fn status(self) -> AgentStatus {
        AgentStatus::from_closing_balance(self.closing)
    }
}

/// Returns the balance pair from the most recent transaction, or zeros when
/// the list is empty.
///
/// Transactions without a date sort oldest. On a date tie the first record
/// in list order wins, matching a stable descending sort.
pub fn latest_balance(transactions: &[Transaction]) -> BalancePair {
    transactions
        .iter()
        .rev()
        .max_by_key(|tx| tx.date)
        .map(|tx| BalancePair {
            opening: tx.opening_balance,
            closing: tx.closing_balance,
        })
        .unwrap_or_default()
}

/// Groups transactions by agent and keeps each agent's most recent balance
/// pair. Tie-breaking matches [`latest_balance`].
pub fn balances_by_agent(transactions: &[Transaction]) -> HashMap<u64, BalancePair> {
    let mut latest: HashMap<u64, &Transaction> = HashMap::new();
    for tx in transactions {
        match latest.get(&tx.agent_id) {
            Some(current) if tx.date <= current.date => {}
            _ => {
                latest.insert(tx.agent_id, tx);
            }
        }
    }
    latest
        .into_iter()
        .map(|(agent_id, tx)| {
            (
                agent_id,
                BalancePair {
                    opening: tx.opening_balance,
                    closing: tx.closing_balance,
                },
            )
        })
        .collect()
}

/// Case-insensitive substring filter over caller-chosen fields.
///
/// A blank or whitespace-only query returns everything. An item matches when
/// any of its searched fields contains the query.
pub fn filter_by_search<'a, T, F>(items: &'a [T], query: &str, fields: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Vec<&str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            fields(item)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort order for debtor listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebtorSortKey {
    /// Largest outstanding balance first (default)
    #[default]
    Amount,
    /// Name ascending, case-insensitive
    Name,
    /// Newest record first
    Created,
}

impl FromStr for DebtorSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amount" => Ok(DebtorSortKey::Amount),
            "name" => Ok(DebtorSortKey::Name),
            "created" => Ok(DebtorSortKey::Created),
            other => Err(format!(
                "unknown sort key '{other}' (expected amount, name, or created)"
            )),
        }
    }
}

/// Sorts debtors in place. All orders are stable, so records that compare
/// equal keep their original relative order.
pub fn sort_debtors(debtors: &mut [Debtor], key: DebtorSortKey) {
    match key {
        DebtorSortKey::Amount => debtors.sort_by(|a, b| b.balance_due.cmp(&a.balance_due)),
        DebtorSortKey::Name => debtors.sort_by_key(|d| d.name.to_lowercase()),
        DebtorSortKey::Created => debtors.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Share of debt recovered, in percent.
///
/// `collected / (outstanding + collected) * 100`, with 0.0 when the
/// denominator is zero so an empty book never divides by zero.
pub fn collection_rate(outstanding: i64, collected: i64) -> f64 {
    let denominator = outstanding + collected;
    if denominator == 0 {
        return 0.0;
    }
    collected as f64 / denominator as f64 * 100.0
}
