//! Quote Keeper Server
//!
//! REST API for managing quotes stored in a relational database, with a
//! lookup path into the Quotable public API.

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod storage;

use fetcher::QuoteFetcher;
use services::QuoteService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<QuoteService>,
    pub fetcher: Arc<dyn QuoteFetcher>,
}
