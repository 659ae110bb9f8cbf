//! MySQL quote store

use super::{contains_pattern, QuoteRow, QuoteStore};
use crate::config::MySqlSettings;
use crate::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use quote_types::{NewQuote, Quote, QuoteUpdate};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, MySqlPool};

const QUOTE_COLUMNS: &str = "id, text, author, created_at";

pub struct MySqlQuoteStore {
    pool: MySqlPool,
}

impl MySqlQuoteStore {
    pub async fn new(settings: &MySqlSettings, max_connections: u32) -> anyhow::Result<Self> {
        tracing::info!("Connecting to MySQL at {}", settings.redacted_url());

        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", settings.redacted_url()))?;

        tracing::info!("MySQL connection established, ensuring schema...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to create quotes table")?;

        tracing::info!("MySQL quote store ready");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &MySqlPool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                text TEXT NOT NULL,
                author VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                INDEX idx_quotes_author (author)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

async fn fetch_quote<'e, E>(executor: E, id: i64) -> std::result::Result<Option<Quote>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let row: Option<QuoteRow> =
        sqlx::query_as(&format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(Into::into))
}

#[async_trait]
impl QuoteStore for MySqlQuoteStore {
    async fn insert(&self, quote: &NewQuote) -> Result<Quote> {
        // created_at comes from the column default
        let result = sqlx::query("INSERT INTO quotes (text, author) VALUES (?, ?)")
            .bind(&quote.text)
            .bind(&quote.author)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_id() as i64;
        Ok(fetch_quote(&self.pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?)
    }

    async fn get(&self, id: i64) -> Result<Option<Quote>> {
        Ok(fetch_quote(&self.pool, id).await?)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Quote>> {
        let rows: Vec<QuoteRow> = sqlx::query_as(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, needle: &str) -> Result<Vec<Quote>> {
        // Backslash is MySQL's default LIKE escape character
        let pattern = contains_pattern(needle);
        let rows: Vec<QuoteRow> = sqlx::query_as(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE text LIKE ? OR author LIKE ? ORDER BY id"
        ))
        .bind(&pattern)
        .bind(&pattern)
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

        sqlx::query("UPDATE quotes SET text = ?, author = ? WHERE id = ?")
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

        sqlx::query("DELETE FROM quotes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(existing))
    }

    async fn random(&self) -> Result<Option<Quote>> {
        let row: Option<QuoteRow> = sqlx::query_as(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY RAND() LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists(&self, text: &str, author: &str) -> Result<bool> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM quotes WHERE text = ? AND author = ? LIMIT 1")
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
        "mysql"
    }
}
