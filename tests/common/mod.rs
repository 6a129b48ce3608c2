#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::util::ServiceExt;

use recipebox_server::db;
use recipebox_server::db::models::{Recipe, Tag, User};
use recipebox_server::db::services::{recipe_service, user_service};
use recipebox_server::server::config::ServerConfig;
use recipebox_server::services::auth_service;
use recipebox_server::web;

pub const TEST_JWT_SECRET: &str = "test-secret-key";

/// Builds the real application router on top of an in-memory database.
pub async fn create_test_app() -> (Router, SqlitePool) {
    let pool = db::connect_in_memory().await.unwrap();

    let config = ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
    };

    let app = web::create_axum_router(pool.clone(), Arc::new(config));
    (app, pool)
}

/// Creates a user directly in the database and returns it with a valid
/// bearer token.
pub async fn create_user_with_token(pool: &SqlitePool, email: &str, password: &str) -> (User, String) {
    let password_hash = auth_service::hash_password(password).unwrap();
    let user = user_service::create_user(pool, email, "Test Name", &password_hash)
        .await
        .unwrap();
    let token = auth_service::create_token_for_user(&user, TEST_JWT_SECRET)
        .unwrap()
        .token;
    (user, token)
}

/// Inserts a sample recipe with optional tag names, bypassing the HTTP layer.
pub async fn create_sample_recipe(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
    tags: &[&str],
) -> (Recipe, Vec<Tag>) {
    recipe_service::create_recipe(
        pool,
        user_id,
        recipe_service::NewRecipe {
            title: title.to_string(),
            time_minutes: 12,
            price: "5.25".to_string(),
            link: Some("http://example.com/recipe".to_string()),
            description: Some("sample description".to_string()),
            tags: tags.iter().map(|s| s.to_string()).collect(),
        },
    )
    .await
    .unwrap()
}

fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends one request through the router and returns status plus parsed JSON
/// body (`Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(build_request(method, uri, token, body))
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Names of the tags in a response object's `tags` array, sorted.
pub fn tag_names(value: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = value["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
