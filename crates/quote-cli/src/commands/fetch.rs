//! Fetch command - query the external quote source once

use anyhow::Result;
use colored::Colorize;
use quote_server::config::ServerConfig;
use quote_server::fetcher::{QuotableFetcher, QuoteFetcher};

pub async fn run(author: Option<String>, query: Option<String>) -> Result<()> {
    let config = ServerConfig::from_env()?;
    let fetcher = QuotableFetcher::new(config.quotable_api_url);

    match fetcher.fetch(author.as_deref(), query.as_deref()).await {
        Some(quote) => {
            println!("\"{}\"", quote.text);
            println!("  - {} {}", quote.author.bold(), format!("[{}]", quote.source).dimmed());
        }
        None => {
            println!("{}", "⚠️ No quote found in the external source".yellow());
        }
    }

    Ok(())
}
