//! Commission command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use fieldledger_core::api::types::{CommissionUpdate, NewCommission};
use fieldledger_core::config::Config;
use fieldledger_core::money::format_currency;

pub async fn list(config: &Config, month: Option<u32>, year: Option<i32>) -> Result<()> {
    if let Some(month) = month
        && !(1..=12).contains(&month)
    {
        anyhow::bail!("Month must be between 1 and 12");
    }

    let (client, headers) = super::connect(config)?;
    let commissions = client.list_commissions(&headers, month, year).await?;

    if commissions.is_empty() {
        println!("No commissions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Agent", "Amount", "Date", "Description"]);
    let mut total = 0_i64;
    for commission in &commissions {
        let agent = if commission.agent_name.is_empty() {
            commission.agent_id.to_string()
        } else {
            commission.agent_name.clone()
        };
        total += commission.amount;
        table.add_row([
            commission.id.to_string(),
            agent,
            format_currency(commission.amount, &config.currency),
            commission.date.map_or_else(String::new, |d| d.to_string()),
            commission.description.clone(),
        ]);
    }
    println!("{table}");
    println!("Total: {}", format_currency(total, &config.currency));

    Ok(())
}

pub async fn create(
    config: &Config,
    agent: u64,
    amount: i64,
    description: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    if amount <= 0 {
        anyhow::bail!("Commission amount must be positive");
    }
    let date = super::parse_date_arg(date)?;

    let (client, headers) = super::connect(config)?;
    let commission = client
        .create_commission(
            &headers,
            &NewCommission {
                agent_id: agent,
                amount,
                description: description
                    .map(str::to_string)
                    .filter(|d| !d.trim().is_empty()),
                date,
            },
        )
        .await?;

    println!(
        "✓ Recorded commission of {} for agent {} (id {})",
        format_currency(commission.amount, &config.currency),
        commission.agent_id,
        commission.id
    );

    Ok(())
}

pub async fn update(
    config: &Config,
    id: u64,
    amount: Option<i64>,
    description: Option<String>,
) -> Result<()> {
    if amount.is_none() && description.is_none() {
        anyhow::bail!("Nothing to update: pass --amount and/or --description");
    }
    if let Some(amount) = amount
        && amount <= 0
    {
        anyhow::bail!("Commission amount must be positive");
    }

    let (client, headers) = super::connect(config)?;
    let commission = client
        .update_commission(
            &headers,
            id,
            &CommissionUpdate {
                amount,
                description,
            },
        )
        .await?;

    println!(
        "✓ Updated commission {} ({})",
        commission.id,
        format_currency(commission.amount, &config.currency)
    );

    Ok(())
}

pub async fn delete(config: &Config, id: u64) -> Result<()> {
    let (client, headers) = super::connect(config)?;
    client.delete_commission(&headers, id).await?;
    println!("✓ Deleted commission {id}");
    Ok(())
}
