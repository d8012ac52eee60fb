//! Store status command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tickerflow_config::AppConfig;
use tickerflow_store::Store;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = Store::connect(&config.database).await?;

    let tables = store.table_status().await?;
    if tables.is_empty() {
        println!("No pipeline tables found. Run init-db first.");
        return Ok(());
    }

    println!(
        "{:<22} {:>10} {:>8}  {:<20} {:<20}",
        "Table", "Rows", "Tickers", "Earliest", "Latest"
    );
    for table in &tables {
        println!(
            "{:<22} {:>10} {:>8}  {:<20} {:<20}",
            table.table,
            table.rows,
            table.tickers,
            format_time(table.earliest),
            format_time(table.latest),
        );
    }

    let staleness = store.ticker_staleness().await?;
    if !staleness.is_empty() {
        println!();
        println!("{:<8} {:>10}  {:<20} {}", "Ticker", "Bars", "Latest", "Age");
        let now = Utc::now();
        for ticker in &staleness {
            let minutes = now.signed_duration_since(ticker.latest).num_minutes();
            println!(
                "{:<8} {:>10}  {:<20} {}",
                ticker.ticker,
                ticker.bars,
                ticker.latest.format("%Y-%m-%d %H:%M:%S"),
                humanize_age(minutes),
            );
        }
    }

    let orders = if tables.iter().any(|t| t.table == "orders") {
        store.recent_orders(10).await?
    } else {
        Vec::new()
    };
    if !orders.is_empty() {
        println!();
        println!("{:<8} {:<6} {:>12}  {}", "Symbol", "Side", "Price", "Placed");
        for order in &orders {
            println!(
                "{:<8} {:<6} {:>12.2}  {}",
                order.symbol,
                order.side.as_str(),
                order.price,
                order.placed_at.format("%Y-%m-%d %H:%M:%S"),
            );
        }
    }

    Ok(())
}

fn format_time(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

fn humanize_age(minutes: i64) -> String {
    let minutes = minutes.max(0);
    if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}
