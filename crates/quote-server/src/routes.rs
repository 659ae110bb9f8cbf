//! HTTP router

use crate::handlers::{self, external, quotes};
use crate::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Origins of the front-end dev servers
const DEV_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:5173",
];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/quotes", get(quotes::list).post(quotes::create))
        .route("/quotes/random", get(quotes::random))
        .route("/quotes/search", get(quotes::search))
        .route(
            "/quotes/:id",
            get(quotes::get).put(quotes::update).delete(quotes::delete),
        )
        .route("/external/fetch", get(external::fetch))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router wrapped so that `/quotes/` and `/quotes` resolve alike
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = DEV_ORIGINS
        .iter()
        .copied()
        .map(HeaderValue::from_static)
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::QuoteFetcher;
    use crate::services::QuoteService;
    use crate::storage::SqliteQuoteStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use quote_types::ExternalQuote;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Knows exactly one author
    struct StubFetcher;

    #[async_trait]
    impl QuoteFetcher for StubFetcher {
        async fn fetch(&self, author: Option<&str>, _query: Option<&str>) -> Option<ExternalQuote> {
            (author == Some("Plato")).then(|| ExternalQuote {
                text: "Be kind.".to_string(),
                author: "Plato".to_string(),
                source: "stub".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    async fn test_app() -> NormalizePath<Router> {
        let store = SqliteQuoteStore::in_memory().await.unwrap();
        let state = AppState {
            quotes: Arc::new(QuoteService::new(Arc::new(store))),
            fetcher: Arc::new(StubFetcher),
        };
        app(state)
    }

    async fn send(
        app: &NormalizePath<Router>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create(app: &NormalizePath<Router>, text: &str, author: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/quotes",
            Some(json!({ "text": text, "author": author })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_create_get_delete_lifecycle() {
        let app = test_app().await;

        let created = create(&app, "A", "B").await;
        assert_eq!(created["id"], 1);

        let (status, body) = send(&app, Method::GET, "/quotes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["text"], "A");
        assert_eq!(body["author"], "B");
        assert!(body["created_at"].is_string());

        let (status, body) = send(&app, Method::DELETE, "/quotes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (status, body) = send(&app, Method::GET, "/quotes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, _) = send(&app, Method::DELETE, "/quotes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let app = test_app().await;
        create(&app, "A", "B").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/quotes",
            Some(json!({ "text": "A", "author": "B" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "conflict");
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/quotes",
            Some(json!({ "text": "", "author": "B" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn test_malformed_input_is_json_validation_error() {
        let app = test_app().await;
        create(&app, "A", "B").await;

        let (status, body) =
            send(&app, Method::POST, "/quotes", Some(json!({ "text": "A" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
        assert!(body["error"].is_string());

        let (status, body) =
            send(&app, Method::PUT, "/quotes/1", Some(json!({ "text": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        let (status, body) = send(&app, Method::GET, "/quotes/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/quotes")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "validation");

        // Quote 1 is untouched
        let (_, body) = send(&app, Method::GET, "/quotes/1", None).await;
        assert_eq!(body["text"], "A");
    }

    #[tokio::test]
    async fn test_list_defaults_and_limit() {
        let app = test_app().await;
        for i in 0..3 {
            create(&app, &format!("Quote {i}"), "Author").await;
        }

        let (status, body) = send(&app, Method::GET, "/quotes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = send(&app, Method::GET, "/quotes?skip=1&limit=1", None).await;
        let page = body.as_array().unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["text"], "Quote 1");

        let (status, body) = send(&app, Method::GET, "/quotes?limit=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn test_random_empty_then_filled() {
        let app = test_app().await;

        let (status, _) = send(&app, Method::GET, "/quotes/random", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        create(&app, "Only", "One").await;
        let (status, body) = send(&app, Method::GET, "/quotes/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Only");
    }

    #[tokio::test]
    async fn test_update_partial_and_missing() {
        let app = test_app().await;
        create(&app, "Old text", "Author").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/quotes/1",
            Some(json!({ "text": "New text" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "New text");
        assert_eq!(body["author"], "Author");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/quotes/42",
            Some(json!({ "author": "Nobody" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = test_app().await;
        create(&app, "Life is beautiful", "Someone").await;
        create(&app, "Unrelated", "Another").await;

        let (status, body) = send(&app, Method::GET, "/quotes/search?query=life", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = body.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["text"], "Life is beautiful");

        let (status, body) = send(&app, Method::GET, "/quotes/search?query=zzz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());

        let (status, body) = send(&app, Method::GET, "/quotes/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        let (status, _) = send(&app, Method::GET, "/quotes/search?query=", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_external_fetch() {
        let app = test_app().await;

        let (status, body) =
            send(&app, Method::GET, "/external/fetch?author=Unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, body) = send(&app, Method::GET, "/external/fetch?author=Plato", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "text": "Be kind.", "author": "Plato", "source": "stub" })
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_routes() {
        let app = test_app().await;
        create(&app, "A", "B").await;

        let (status, body) = send(&app, Method::GET, "/quotes/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, "/quotes/random/", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/quotes/search/?query=A", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) =
            send(&app, Method::GET, "/external/fetch/?author=Plato", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"], "Plato");
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
