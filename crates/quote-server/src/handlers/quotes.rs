//! Quote handlers

use super::ApiError;
use crate::services::DEFAULT_LIST_LIMIT;
use crate::AppState;
use crate::extractors::{JsonBody, PathParam, QueryParams};
use axum::{extract::State, http::StatusCode, Json};
use quote_types::{DeleteConfirmation, NewQuote, Quote, QuoteUpdate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    skip: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewQuote>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    let quote = state.quotes.create(req).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let quotes = state
        .quotes
        .list(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .await?;
    Ok(Json(quotes))
}

pub async fn random(State(state): State<AppState>) -> Result<Json<Quote>, ApiError> {
    state
        .quotes
        .random()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No quotes in the database"))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Quote>, ApiError> {
    state
        .quotes
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Quote {} not found", id)))
}

pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<QuoteUpdate>,
) -> Result<Json<Quote>, ApiError> {
    state
        .quotes
        .update(id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Quote {} not found", id)))
}

pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    match state.quotes.delete(id).await? {
        Some(removed) => Ok(Json(DeleteConfirmation::new(removed.id))),
        None => Err(ApiError::not_found(format!("Quote {} not found", id))),
    }
}

pub async fn search(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let query = params
        .query
        .ok_or_else(|| ApiError::validation("query parameter is required"))?;

    let quotes = state.quotes.search(&query).await?;
    Ok(Json(quotes))
}
