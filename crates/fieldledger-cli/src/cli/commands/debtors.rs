//! Debtor command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use fieldledger_core::api::types::{DebtorPayment, NewDebtor};
use fieldledger_core::config::Config;
use fieldledger_core::derive::{self, DebtSeverity, DebtorSortKey};
use fieldledger_core::money::format_currency;

pub async fn list(config: &Config, search: Option<&str>, sort: Option<&str>) -> Result<()> {
    let sort_key = match sort {
        Some(raw) => raw
            .parse::<DebtorSortKey>()
            .map_err(|err| anyhow::anyhow!(err))?,
        None => config.default_debtor_sort,
    };

    let (client, headers) = super::connect(config)?;
    let debtors = client.list_debtors(&headers).await?;

    let mut visible: Vec<_> = derive::filter_by_search(&debtors, search.unwrap_or(""), |d| {
        vec![d.name.as_str(), d.phone.as_str(), d.agent_name.as_str()]
    })
    .into_iter()
    .cloned()
    .collect();
    derive::sort_debtors(&mut visible, sort_key);

    if visible.is_empty() {
        println!("No debtors found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Name", "Phone", "Agent", "Due", "Paid", "Severity"]);
    for debtor in &visible {
        table.add_row([
            debtor.id.to_string(),
            debtor.name.clone(),
            debtor.phone.clone(),
            debtor.agent_name.clone(),
            format_currency(debtor.balance_due, &config.currency),
            format_currency(debtor.total_paid, &config.currency),
            DebtSeverity::classify(debtor.balance_due).label().to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn create(
    config: &Config,
    name: &str,
    phone: &str,
    balance_due: i64,
    agent: Option<&str>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Debtor name cannot be empty");
    }
    if balance_due <= 0 {
        anyhow::bail!("Balance due must be positive");
    }

    let (client, headers) = super::connect(config)?;
    let debtor = client
        .create_debtor(
            &headers,
            &NewDebtor {
                name: name.to_string(),
                phone: phone.trim().to_string(),
                balance_due,
                agent_name: agent.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            },
        )
        .await?;

    println!(
        "✓ Registered debtor {} (id {}) owing {} [{}]",
        debtor.name,
        debtor.id,
        format_currency(debtor.balance_due, &config.currency),
        DebtSeverity::classify(debtor.balance_due).label()
    );

    Ok(())
}

pub async fn pay(config: &Config, id: u64, amount: i64, notes: Option<&str>) -> Result<()> {
    if amount <= 0 {
        anyhow::bail!("Payment amount must be positive");
    }

    let (client, headers) = super::connect(config)?;
    let debtor = client
        .pay_debtor(
            &headers,
            id,
            &DebtorPayment {
                amount,
                notes: notes.map(str::to_string),
            },
        )
        .await?;

    println!(
        "✓ Recorded payment of {} from {}",
        format_currency(amount, &config.currency),
        debtor.name
    );
    println!(
        "  Remaining: {}  Paid to date: {}",
        format_currency(debtor.balance_due, &config.currency),
        format_currency(debtor.total_paid, &config.currency)
    );

    Ok(())
}
