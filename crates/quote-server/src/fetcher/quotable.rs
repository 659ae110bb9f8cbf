//! Quotable API client (https://api.quotable.io)

use super::QuoteFetcher;
use async_trait::async_trait;
use quote_types::ExternalQuote;
use serde::Deserialize;
use tracing::{debug, warn};

const SOURCE_NAME: &str = "quotable";

#[derive(Debug, Deserialize)]
struct QuotableQuote {
    content: Option<String>,
    author: Option<String>,
}

/// `/random` answers with one object, `/quotes/random` with a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RandomResponse {
    Many(Vec<QuotableQuote>),
    One(QuotableQuote),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<QuotableQuote>,
}

impl QuotableQuote {
    fn into_external(self) -> Option<ExternalQuote> {
        let Some(text) = self.content.filter(|c| !c.trim().is_empty()) else {
            warn!("Quotable returned a quote without content");
            return None;
        };
        Some(ExternalQuote {
            text,
            author: self.author.unwrap_or_else(|| "Unknown".to_string()),
            source: SOURCE_NAME.to_string(),
        })
    }
}

fn parse_random(body: &str) -> Option<ExternalQuote> {
    match serde_json::from_str::<RandomResponse>(body) {
        Ok(RandomResponse::Many(quotes)) => quotes.into_iter().next()?.into_external(),
        Ok(RandomResponse::One(quote)) => quote.into_external(),
        Err(e) => {
            warn!("Error parsing Quotable response: {}", e);
            None
        }
    }
}

fn parse_search(body: &str) -> Option<ExternalQuote> {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(response) => response.results.into_iter().next()?.into_external(),
        Err(e) => {
            warn!("Error parsing Quotable search response: {}", e);
            None
        }
    }
}

pub struct QuotableFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl QuotableFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_body(&self, path: &str, params: &[(&str, &str)]) -> Option<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let response = match self.client.get(&url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching from Quotable: {}", e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!("Quotable returned an error status: {}", e);
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Error reading Quotable response: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl QuoteFetcher for QuotableFetcher {
    async fn fetch(&self, author: Option<&str>, query: Option<&str>) -> Option<ExternalQuote> {
        let author = author.filter(|a| !a.trim().is_empty());
        let query = query.filter(|q| !q.trim().is_empty());

        match (author, query) {
            (Some(author), _) => {
                let body = self
                    .get_body("/random", &[("author", author), ("limit", "1")])
                    .await?;
                parse_random(&body)
            }
            (None, Some(query)) => {
                let body = self
                    .get_body("/search/quotes", &[("query", query), ("limit", "1")])
                    .await?;
                parse_search(&body)
            }
            (None, None) => {
                let body = self.get_body("/random", &[]).await?;
                parse_random(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}
