#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bson::Document;
use catalog_api::config::{Environment, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_db::memory::MemoryProductStore;
use catalog_db::mongo::MongoConfig;
use catalog_db::SharedStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Allows any CORS origin. The Mongo settings are never used; tests run against an in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        environment: Environment::Development,
        mongo: MongoConfig {
            uri: "mongodb://unused".to_string(),
            database: "products_db".to_string(),
            collection: "catalog".to_string(),
            counters_collection: "counters".to_string(),
        },
    }
}

/// Build the full application router over `store`, with the same
/// middleware stack production uses.
pub fn build_test_app(store: SharedStore) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A fresh in-memory store plus a router over it.
pub fn empty_app() -> (Arc<MemoryProductStore>, Router) {
    seeded_app(Vec::new())
}

/// An in-memory store seeded with `docs`, plus a router over it.
pub fn seeded_app(docs: Vec<Document>) -> (Arc<MemoryProductStore>, Router) {
    let store = Arc::new(MemoryProductStore::with_documents(docs));
    let app = build_test_app(store.clone());
    (store, app)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
