//! Quote management service

use crate::error::{QuoteError, Result};
use crate::storage::QuoteStore;
use quote_types::{NewQuote, Quote, QuoteUpdate};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Absence is reported as `Ok(None)`; errors are reserved for bad input and
/// store failures.
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, quote: NewQuote) -> Result<Quote> {
        quote.validate()?;

        // Not atomic with the insert; two concurrent identical creates can
        // both pass. The schema has no unique key on (text, author).
        if self.store.exists(&quote.text, &quote.author).await? {
            return Err(QuoteError::Conflict(format!(
                "quote by {} already exists",
                quote.author
            )));
        }

        let created = self.store.insert(&quote).await?;
        info!("Created quote {} by {}", created.id, created.author);
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Quote>> {
        self.store.get(id).await
    }

    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Quote>> {
        self.store.list(skip, limit.min(MAX_LIST_LIMIT)).await
    }

    pub async fn update(&self, id: i64, changes: QuoteUpdate) -> Result<Option<Quote>> {
        changes.validate()?;

        if changes.is_empty() {
            debug!("Empty update for quote {}", id);
            return self.store.get(id).await;
        }

        let updated = self.store.update(id, &changes).await?;
        if updated.is_some() {
            info!("Updated quote {}", id);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Quote>> {
        let removed = self.store.delete(id).await?;
        if removed.is_some() {
            info!("Deleted quote {}", id);
        }
        Ok(removed)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Quote>> {
        if query.trim().is_empty() {
            return Err(QuoteError::Validation(
                "search query must not be empty".to_string(),
            ));
        }

        let found = self.store.search(query).await?;
        debug!("Search {:?} matched {} quotes", query, found.len());
        Ok(found)
    }

    pub async fn random(&self) -> Result<Option<Quote>> {
        self.store.random().await
    }
}
