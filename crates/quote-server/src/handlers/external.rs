//! External quote lookup

use super::ApiError;
use crate::AppState;
use crate::extractors::QueryParams;
use axum::{extract::State, Json};
use quote_types::ExternalQuote;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct FetchParams {
    author: Option<String>,
    query: Option<String>,
}

pub async fn fetch(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<FetchParams>,
) -> Result<Json<ExternalQuote>, ApiError> {
    info!(
        "External lookup via {}: author={:?}, query={:?}",
        state.fetcher.name(),
        params.author,
        params.query
    );

    state
        .fetcher
        .fetch(params.author.as_deref(), params.query.as_deref())
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No quote found in the external source"))
}
