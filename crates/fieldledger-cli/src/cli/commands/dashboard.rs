//! Dashboard command handlers.

use anyhow::Result;
use fieldledger_core::api::types::DailyStats;
use fieldledger_core::config::Config;
use fieldledger_core::money::format_currency;

pub async fn show(config: &Config, employee: Option<u64>) -> Result<()> {
    let (client, headers) = super::connect(config)?;
    let snapshot = client.dashboard(&headers, employee).await?;

    match employee {
        Some(id) => println!("Dashboard (employee {id})"),
        None => println!("Dashboard"),
    }
    println!();

    println!("Quick stats");
    println!("  Active agents:     {}", snapshot.quick.active_agents);
    println!("  Total debtors:     {}", snapshot.quick.total_debtors);
    println!(
        "  Outstanding debt:  {}",
        format_currency(snapshot.quick.outstanding_debt, &config.currency)
    );
    println!(
        "  Collected debt:    {}",
        format_currency(snapshot.quick.collected_debt, &config.currency)
    );
    println!("  Collection rate:   {:.1}%", snapshot.collection_rate());
    println!(
        "  Commissions (this month): {}",
        format_currency(snapshot.quick.commissions_this_month, &config.currency)
    );
    println!();

    print_daily(&snapshot.daily, config);
    println!();

    println!("Agents");
    println!("  Total:        {}", snapshot.agents.total);
    println!("  Active:       {}", snapshot.agents.active);
    println!("  Needs update: {}", snapshot.agents.needs_update);
    println!(
        "  Combined closing balance: {}",
        format_currency(snapshot.agents.combined_closing_balance, &config.currency)
    );
    println!();

    println!("Debtors");
    println!("  Total:         {}", snapshot.debtors.total);
    println!("  High severity: {}", snapshot.debtors.high_severity);
    println!(
        "  Total due:     {}",
        format_currency(snapshot.debtors.total_due, &config.currency)
    );
    println!(
        "  Total paid:    {}",
        format_currency(snapshot.debtors.total_paid, &config.currency)
    );

    Ok(())
}

pub async fn daily(config: &Config, date: Option<&str>) -> Result<()> {
    let date = date.map(|raw| super::parse_date_arg(Some(raw))).transpose()?;

    let (client, headers) = super::connect(config)?;
    let stats = client.daily_stats(&headers, date).await?;

    print_daily(&stats, config);

    Ok(())
}

fn print_daily(stats: &DailyStats, config: &Config) {
    match stats.date {
        Some(date) => println!("Daily totals ({date})"),
        None => println!("Daily totals"),
    }
    println!(
        "  Opening total:    {}",
        format_currency(stats.total_opening, &config.currency)
    );
    println!(
        "  Closing total:    {}",
        format_currency(stats.total_closing, &config.currency)
    );
    println!("  Transactions:     {}", stats.transactions_recorded);
    println!("  Agents reporting: {}", stats.agents_reporting);
}
