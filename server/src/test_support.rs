use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool};
use serde_json::Value;

use crate::{
    config::AppConfig,
    http::{AppState, build_router},
};

/// Router over a fresh, migrated in-memory store, plus a handle on that store.
pub async fn test_app() -> (Router, DbPool) {
    let pool = platform_db::connect(&DatabaseSettings::in_memory())
        .await
        .unwrap();
    Migrator::up(&pool, None).await.unwrap();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(AppConfig::default().with_in_memory_database()),
    };
    (build_router(state), pool)
}

pub async fn test_router() -> Router {
    test_app().await.0
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
