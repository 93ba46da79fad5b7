#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tower::ServiceExt;

use todo_api::auth::{self, Claims};
use todo_api::config::{AppConfig, Environment};
use todo_api::state::AppState;
use todo_api::store::{MemoryStore, TableStore};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config(allow_all_users: bool) -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        allow_all_users,
        jwt_secret: TEST_SECRET.to_string(),
        port: 0,
        database_url: None,
    }
}

/// In-process app over a fresh memory store
pub fn test_app(allow_all_users: bool) -> Router {
    let (app, _) = test_app_with_store(allow_all_users);
    app
}

/// Same, but keeps a handle to the store so tests can seed or inspect rows
pub fn test_app_with_store(allow_all_users: bool) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = todo_api::app(AppState::new(test_config(allow_all_users), store.clone()));
    (app, store)
}

pub fn bearer_for(user_id: &str) -> String {
    let claims = Claims::new(user_id, 1);
    let token = auth::generate_token(&claims, TEST_SECRET).expect("token generation");
    format!("Bearer {}", token)
}

/// Seed a row directly into the store, bypassing the HTTP surface
pub async fn seed_todo(store: &MemoryStore, title: &str, user_id: Option<&str>) -> Value {
    let mut row = Map::new();
    row.insert("title".to_string(), Value::String(title.to_string()));
    row.insert(
        "user_id".to_string(),
        user_id.map_or(Value::Null, |u| Value::String(u.to_string())),
    );
    let inserted = store.insert("todo_items", row).await.expect("seed insert");
    Value::Object(inserted.into_iter().next().expect("seeded row"))
}

/// Send one request through the router and collect the JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
