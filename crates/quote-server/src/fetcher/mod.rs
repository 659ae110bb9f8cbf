//! External quote sources

pub mod quotable;

pub use quotable::QuotableFetcher;

use async_trait::async_trait;
use quote_types::ExternalQuote;

/// Looks up quotes in a third-party service.
///
/// Implementations never fail: transport and parse problems are logged and
/// reported as `None`.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// `author` takes precedence over `query`; with neither, any quote will do
    async fn fetch(&self, author: Option<&str>, query: Option<&str>) -> Option<ExternalQuote>;

    fn name(&self) -> &'static str;
}
