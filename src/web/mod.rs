use axum::{middleware as axum_middleware, routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::server::config::ServerConfig;
use crate::web::middleware::auth;
use crate::web::routes::{recipe_routes, user_routes};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// Builds the full application router. Signup, token issuance and the health
/// check are public; everything else sits behind the bearer-token middleware.
pub fn create_axum_router(pool: SqlitePool, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { pool, config });

    let public_routes = user_routes::create_user_router().route("/health", get(health_check_handler));

    let protected_routes = user_routes::create_me_router()
        .merge(recipe_routes::create_recipe_router())
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth,
        ));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state)
}
