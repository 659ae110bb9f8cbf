//! Business logic services

pub mod quote_service;

pub use quote_service::{QuoteService, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
