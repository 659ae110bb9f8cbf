//! Request extractors that reject with the JSON error body
//!
//! axum's stock `Json`, `Query` and `Path` answer bad input with plain text
//! (and 422 for body mismatches). These wrappers route every rejection
//! through [`ApiError`] so clients always get a 400 `validation` error.

use crate::handlers::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Path segment parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
