mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::test_app(false);
    let (status, body) = common::send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn scoped_requests_require_a_bearer_token() -> Result<()> {
    let app = common::test_app(false);

    let (status, body) = common::send(&app, Method::GET, "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/todos",
        None,
        Some(json!({"title": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() -> Result<()> {
    let app = common::test_app(false);

    let (status, _) = common::send(&app, Method::GET, "/todos", Some("Token abc"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        common::send(&app, Method::GET, "/todos", Some("Bearer not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unscoped_mode_needs_no_header_and_sees_all_users() -> Result<()> {
    let (app, store) = common::test_app_with_store(true);
    common::seed_todo(&store, "alpha", Some("u1")).await;
    common::seed_todo(&store, "beta", Some("u2")).await;
    common::seed_todo(&store, "gamma", None).await;

    let (status, body) = common::send(&app, Method::GET, "/todos", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let todos = body["todos"].as_array().expect("todos array");
    assert_eq!(todos.len(), 3);
    Ok(())
}

#[tokio::test]
async fn scoped_list_only_returns_the_callers_items() -> Result<()> {
    let (app, store) = common::test_app_with_store(false);
    common::seed_todo(&store, "mine", Some("u1")).await;
    common::seed_todo(&store, "theirs", Some("u2")).await;

    let token = common::bearer_for("u1");
    let (status, body) = common::send(&app, Method::GET, "/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let todos = body["todos"].as_array().expect("todos array");
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "mine");
    Ok(())
}
