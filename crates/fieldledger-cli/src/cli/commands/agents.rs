//! Agent command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use fieldledger_core::api::types::NewAgent;
use fieldledger_core::config::Config;
use fieldledger_core::derive::{self, BalancePair};
use fieldledger_core::money::format_currency;

pub async fn list(config: &Config, search: Option<&str>, employee: Option<u64>) -> Result<()> {
    let (client, headers) = super::connect(config)?;

    let agents = client.list_agents(&headers, employee).await?;
    let transactions = client.list_transactions(&headers, None).await?;
    let balances = derive::balances_by_agent(&transactions);

    let visible = derive::filter_by_search(&agents, search.unwrap_or(""), |agent| {
        vec![
            agent.name.as_str(),
            agent.phone.as_str(),
            agent.type_of_agent.as_str(),
        ]
    });

    if visible.is_empty() {
        println!("No agents found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Name", "Phone", "Type", "Opening", "Closing", "Status"]);
    for agent in &visible {
        let pair = balances.get(&agent.id).copied().unwrap_or_default();
        table.add_row([
            agent.id.to_string(),
            agent.name.clone(),
            agent.phone.clone(),
            agent.type_of_agent.clone(),
            format_currency(pair.opening, &config.currency),
            format_currency(pair.closing, &config.currency),
            pair.status().label().to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}

pub async fn create(
    config: &Config,
    name: &str,
    phone: &str,
    type_of_agent: &str,
    opening_balance: i64,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Agent name cannot be empty");
    }
    if opening_balance < 0 {
        anyhow::bail!("Opening balance cannot be negative");
    }

    let (client, headers) = super::connect(config)?;
    let agent = client
        .create_agent(
            &headers,
            &NewAgent {
                name: name.to_string(),
                phone: phone.trim().to_string(),
                type_of_agent: type_of_agent.trim().to_string(),
                opening_balance,
            },
        )
        .await?;

    println!(
        "✓ Registered agent {} (id {}) with opening balance {}",
        agent.name,
        agent.id,
        format_currency(agent.opening_balance, &config.currency)
    );

    Ok(())
}

pub async fn balance(config: &Config, id: u64) -> Result<()> {
    let (client, headers) = super::connect(config)?;

    let transactions = client.list_transactions(&headers, Some(id)).await?;
    let pair: BalancePair = derive::latest_balance(&transactions);

    println!("Opening: {}", format_currency(pair.opening, &config.currency));
    println!("Closing: {}", format_currency(pair.closing, &config.currency));
    println!("Status:  {}", pair.status().label());
    if transactions.is_empty() {
        println!("(no transactions recorded for agent {id})");
    }

    Ok(())
}
