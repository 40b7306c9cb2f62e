//! Transaction command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use fieldledger_core::api::types::NewTransaction;
use fieldledger_core::config::Config;
use fieldledger_core::money::format_currency;

pub async fn list(config: &Config, agent: Option<u64>) -> Result<()> {
    let (client, headers) = super::connect(config)?;
    let transactions = client.list_transactions(&headers, agent).await?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Agent", "Date", "Opening", "Closing", "Change", "Notes"]);
    for tx in &transactions {
        let date = tx.date.map_or_else(String::new, |d| d.to_string());
        let change = format!(
            "{} {}",
            if tx.is_credit() { "+" } else { "-" },
            format_currency(tx.amount_delta(), &config.currency)
        );
        table.add_row([
            tx.id.to_string(),
            tx.agent_id.to_string(),
            date,
            format_currency(tx.opening_balance, &config.currency),
            format_currency(tx.closing_balance, &config.currency),
            change,
            tx.notes.clone(),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn create(
    config: &Config,
    agent: u64,
    opening_balance: i64,
    closing_balance: i64,
    notes: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    if opening_balance < 0 || closing_balance < 0 {
        anyhow::bail!("Balances cannot be negative");
    }
    let date = super::parse_date_arg(date)?;

    let (client, headers) = super::connect(config)?;
    let tx = client
        .create_transaction(
            &headers,
            &NewTransaction {
                agent_id: agent,
                opening_balance,
                closing_balance,
                notes: notes.map(str::to_string).filter(|n| !n.trim().is_empty()),
                date,
            },
        )
        .await?;

    let kind = if tx.is_credit() { "credit" } else { "debit" };
    println!(
        "✓ Recorded {kind} of {} for agent {} on {date}",
        format_currency(tx.amount_delta(), &config.currency),
        tx.agent_id
    );
    println!(
        "  Opening: {}  Closing: {}",
        format_currency(tx.opening_balance, &config.currency),
        format_currency(tx.closing_balance, &config.currency)
    );

    Ok(())
}
