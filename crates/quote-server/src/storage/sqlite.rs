//! SQLite quote store (embedded, no external dependencies)

use super::{contains_pattern, QuoteRow, QuoteStore};
use crate::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use quote_types::{NewQuote, Quote, QuoteUpdate};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

const QUOTE_COLUMNS: &str = "id, text, author, created_at";

pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    pub async fn new(database_path: &str, max_connections: u32) -> anyhow::Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. A single connection is kept alive for
    /// the lifetime of the pool, otherwise the data would vanish.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        Self::run_migrations(&pool)
            .await
            .context("Failed to create quotes table")?;

        tracing::info!("SQLite quote store ready");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                author VARCHAR(255) NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes (author)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

async fn fetch_quote<'e, E>(executor: E, id: i64) -> std::result::Result<Option<Quote>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<QuoteRow> =
        sqlx::query_as(&format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(Into::into))
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn insert(&self, quote: &NewQuote) -> Result<Quote> {
        let result = sqlx::query(
            r#"
            INSERT INTO quotes (text, author, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&quote.text)
        .bind(&quote.author)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        Ok(fetch_quote(&self.pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?)
    }

    async fn get(&self, id: i64) -> Result<Option<Quote>> {
        Ok(fetch_quote(&self.pool, id).await?)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Quote>> {
        let rows: Vec<QuoteRow> = sqlx::query_as(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, needle: &str) -> Result<Vec<Quote>> {
        let rows: Vec<QuoteRow> = sqlx::query_as(&format!(
            r#"
            SELECT {QUOTE_COLUMNS} FROM quotes
            WHERE text LIKE ?1 ESCAPE '\' OR author LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#
        ))
        .bind(contains_pattern(needle))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, changes: &QuoteUpdate) -> Result<Option<Quote>> {
        let mut tx = self.pool.begin().await?;

        let Some(existing) = fetch_quote(&mut *tx, id).await? else {
            return Ok(None);
        };
        let updated = changes.apply(&existing);

        sqlx::query("UPDATE quotes SET text = ?1, author = ?2 WHERE id = ?3")
            .bind(&updated.text)
            .bind(&updated.author)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<Option<Quote>> {
        let mut tx = self.pool.begin().await?;

        let Some(existing) = fetch_quote(&mut *tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM quotes WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(existing))
    }

    async fn random(&self) -> Result<Option<Quote>> {
        let row: Option<QuoteRow> = sqlx::query_as(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY RANDOM() LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists(&self, text: &str, author: &str) -> Result<bool> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM quotes WHERE text = ?1 AND author = ?2 LIMIT 1")
                .bind(text)
                .bind(author)
                .fetch_optional(&self.pool)
                .await?;

        Ok(id.is_some())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
