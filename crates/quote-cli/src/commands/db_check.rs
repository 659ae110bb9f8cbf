//! Database connectivity check

use anyhow::{Context, Result};
use colored::Colorize;
use quote_server::config::ServerConfig;
use quote_server::storage;

pub async fn run() -> Result<()> {
    let config = ServerConfig::from_env()?;
    println!("Connecting to: {}", config.database.describe().dimmed());

    let store = storage::connect(&config.database, 1).await?;
    let probe = store.list(0, 1).await.context("Failed to query quotes table");
    store.close().await;
    probe?;

    println!(
        "{} {}",
        "✅ Connected to the database".green(),
        format!("({})", store.backend_name()).dimmed()
    );
    Ok(())
}
