use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::services::recipe_service::{self, NewRecipe, RecipeChanges, RecipeReplacement};
use crate::web::models::{
    validate_price, AuthenticatedUser, CreateRecipeRequest, PatchRecipeRequest, PutRecipeRequest,
    RecipeDetailResponse, RecipeSummaryResponse, TagPayload,
};
use crate::web::{error::AppError, extract::AppJson, AppState};

pub fn create_recipe_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recipes/",
            get(list_recipes_handler).post(create_recipe_handler),
        )
        .route(
            "/recipes/{recipe_id}/",
            get(get_recipe_handler)
                .put(put_recipe_handler)
                .patch(patch_recipe_handler)
                .delete(delete_recipe_handler),
        )
}

fn tag_names(tags: Option<Vec<TagPayload>>) -> Option<Vec<String>> {
    tags.map(|tags| tags.into_iter().map(|tag| tag.name).collect())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be blank.".to_string()));
    }
    Ok(())
}

fn validate_time_minutes(time_minutes: i64) -> Result<(), AppError> {
    if time_minutes < 0 {
        return Err(AppError::InvalidInput(
            "Time in minutes must not be negative.".to_string(),
        ));
    }
    Ok(())
}

async fn list_recipes_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecipeSummaryResponse>>, AppError> {
    let recipes = recipe_service::get_recipes_by_user_id(&app_state.pool, auth_user.id).await?;
    let response = recipes
        .into_iter()
        .map(RecipeSummaryResponse::from)
        .collect();
    Ok(Json(response))
}

async fn create_recipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetailResponse>), AppError> {
    validate_title(&payload.title)?;
    validate_time_minutes(payload.time_minutes)?;
    validate_price(&payload.price)?;

    let new_recipe = NewRecipe {
        title: payload.title,
        time_minutes: payload.time_minutes,
        price: payload.price,
        link: payload.link,
        description: payload.description,
        tags: tag_names(payload.tags).unwrap_or_default(),
    };

    let created = recipe_service::create_recipe(&app_state.pool, auth_user.id, new_recipe).await?;
    info!(user_id = auth_user.id, recipe_id = created.0.id, "recipe created");
    Ok((StatusCode::CREATED, Json(RecipeDetailResponse::from(created))))
}

async fn get_recipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let recipe = recipe_service::get_recipe_for_user(&app_state.pool, recipe_id, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;
    Ok(Json(RecipeDetailResponse::from(recipe)))
}

async fn put_recipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
    AppJson(payload): AppJson<PutRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    validate_title(&payload.title)?;
    validate_time_minutes(payload.time_minutes)?;
    validate_price(&payload.price)?;

    let replacement = RecipeReplacement {
        title: payload.title,
        time_minutes: payload.time_minutes,
        price: payload.price,
        link: payload.link,
        description: payload.description,
        tags: tag_names(payload.tags),
    };
    let updated =
        recipe_service::replace_recipe(&app_state.pool, recipe_id, auth_user.id, replacement)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;
    Ok(Json(RecipeDetailResponse::from(updated)))
}

async fn patch_recipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
    AppJson(payload): AppJson<PatchRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    if let Some(title) = payload.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(time_minutes) = payload.time_minutes {
        validate_time_minutes(time_minutes)?;
    }
    if let Some(price) = payload.price.as_deref() {
        validate_price(price)?;
    }

    let changes = RecipeChanges {
        title: payload.title,
        time_minutes: payload.time_minutes,
        price: payload.price,
        link: payload.link,
        description: payload.description,
        tags: tag_names(payload.tags),
    };
    apply_update(&app_state, recipe_id, auth_user.id, changes).await
}

async fn apply_update(
    app_state: &AppState,
    recipe_id: i64,
    user_id: i64,
    changes: RecipeChanges,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let updated = recipe_service::update_recipe(&app_state.pool, recipe_id, user_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;
    Ok(Json(RecipeDetailResponse::from(updated)))
}

async fn delete_recipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let rows_affected =
        recipe_service::delete_recipe(&app_state.pool, recipe_id, auth_user.id).await?;

    if rows_affected > 0 {
        info!(user_id = auth_user.id, recipe_id, "recipe deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Recipe not found".to_string()))
    }
}
