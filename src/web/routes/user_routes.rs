use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::services::user_service;
use crate::services::auth_service;
use crate::web::models::{
    AuthenticatedUser, RegisterRequest, TokenRequest, TokenResponse, UpdateProfileRequest,
    UserResponse,
};
use crate::web::{error::AppError, extract::AppJson, AppState};

/// Unauthenticated account endpoints: signup and token issuance.
pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/create/", post(register_handler))
        .route("/users/token/", post(token_handler))
}

/// Authenticated self-profile endpoint. Only GET and PATCH are routed, so
/// POST falls through to axum's 405.
pub fn create_me_router() -> Router<Arc<AppState>> {
    Router::new().route("/users/me/", get(get_me_handler).patch(update_me_handler))
}

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = auth_service::register_user(&app_state.pool, payload).await?;
    info!(email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn token_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = auth_service::issue_token(&app_state.pool, payload, &app_state.config.jwt_secret)
        .await?;
    Ok(Json(token))
}

async fn get_me_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::get_user_by_id(&app_state.pool, auth_user.id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(UserResponse {
        name: user.name,
        email: user.email,
    }))
}

async fn update_me_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            auth_service::validate_password(password)?;
            Some(auth_service::hash_password(password)?)
        }
        None => None,
    };

    let user = user_service::update_user_profile(
        &app_state.pool,
        auth_user.id,
        payload.name.as_deref(),
        password_hash.as_deref(),
    )
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(UserResponse {
        name: user.name,
        email: user.email,
    }))
}
