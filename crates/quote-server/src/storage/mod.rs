//! Storage layer
//!
//! A single `quotes` table behind the [`QuoteStore`] trait. MySQL is the
//! production backend; SQLite (embedded) covers local runs and tests.

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlQuoteStore;
pub use sqlite::SqliteQuoteStore;

use crate::config::DatabaseBackend;
use crate::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use quote_types::{NewQuote, Quote, QuoteUpdate};
use std::sync::Arc;

/// Quote record store
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert a quote; the store assigns `id` and `created_at`
    async fn insert(&self, quote: &NewQuote) -> Result<Quote>;
    async fn get(&self, id: i64) -> Result<Option<Quote>>;
    /// Quotes in insertion order
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Quote>>;
    /// Quotes whose text or author contains `needle`
    async fn search(&self, needle: &str) -> Result<Vec<Quote>>;
    async fn update(&self, id: i64, changes: &QuoteUpdate) -> Result<Option<Quote>>;
    /// Remove a quote, returning the removed record
    async fn delete(&self, id: i64) -> Result<Option<Quote>>;
    async fn random(&self) -> Result<Option<Quote>>;
    /// Whether an identical text + author pair is already stored
    async fn exists(&self, text: &str, author: &str) -> Result<bool>;
    /// Release pooled connections
    async fn close(&self);
    fn backend_name(&self) -> &'static str;
}

/// Open the store selected by configuration
pub async fn connect(backend: &DatabaseBackend, max_connections: u32) -> anyhow::Result<Arc<dyn QuoteStore>> {
    let store: Arc<dyn QuoteStore> = match backend {
        DatabaseBackend::MySql(options) => Arc::new(
            MySqlQuoteStore::new(options, max_connections)
                .await
                .context("Failed to initialize MySQL store")?,
        ),
        DatabaseBackend::Sqlite { path } => Arc::new(
            SqliteQuoteStore::new(path, max_connections)
                .await
                .context("Failed to initialize SQLite store")?,
        ),
    };
    Ok(store)
}

/// Build a `LIKE` pattern matching `needle` literally anywhere in a column.
/// `\` is the escape character.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
pub(crate) struct QuoteRow {
    id: i64,
    text: String,
    author: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuoteRow> for Quote {
    fn from(r: QuoteRow) -> Self {
        Quote {
            id: r.id,
            text: r.text,
            author: r.author,
            created_at: r.created_at,
        }
    }
}
