use serde::{Deserialize, Serialize};

use crate::db::models::{Recipe, Tag};
use crate::web::error::AppError;

// --- Auth / user payloads ---

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public view of an account; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

// JWT claims carried by the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub exp: usize,
}

/// Authenticated caller identity, stored as a request extension by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
}

// --- Recipe / tag payloads ---

#[derive(Debug, Serialize, Deserialize)]
pub struct TagPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagPayload>>,
}

/// Full replacement (PUT). Scalar requireds must be present and an omitted
/// link or description resets to null; `tags` keeps the optional
/// present/absent distinction.
#[derive(Debug, Deserialize)]
pub struct PutRecipeRequest {
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagPayload>>,
}

/// Partial update (PATCH). An absent `tags` field leaves the recipe's tag
/// set alone; `"tags": []` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct PatchRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagPayload>>,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        TagResponse {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Listing view: everything except the long-form description.
#[derive(Debug, Serialize)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub tags: Vec<TagResponse>,
}

impl From<(Recipe, Vec<Tag>)> for RecipeSummaryResponse {
    fn from((recipe, tags): (Recipe, Vec<Tag>)) -> Self {
        RecipeSummaryResponse {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Detail view: the summary plus the description.
#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagResponse>,
}

impl From<(Recipe, Vec<Tag>)> for RecipeDetailResponse {
    fn from((recipe, tags): (Recipe, Vec<Tag>)) -> Self {
        RecipeDetailResponse {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            description: recipe.description,
            tags: tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Validates a price string as a fixed-point decimal: at most 5 digits in
/// total and 2 after the point, mirroring the storage column's contract.
pub fn validate_price(price: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidInput("A valid price is required.".to_string());

    let (whole, frac) = match price.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (price, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if price.contains('.') && (frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit())) {
        return Err(invalid());
    }
    if frac.len() > 2 || whole.len() + frac.len() > 5 {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_fixed_point_decimals() {
        assert!(validate_price("12.23").is_ok());
        assert!(validate_price("5").is_ok());
        assert!(validate_price("999.99").is_ok());
    }

    #[test]
    fn price_rejects_malformed_values() {
        assert!(validate_price("").is_err());
        assert!(validate_price("-1.00").is_err());
        assert!(validate_price("1.234").is_err());
        assert!(validate_price("123456").is_err());
        assert!(validate_price("12.").is_err());
        assert!(validate_price("abc").is_err());
    }

    #[test]
    fn absent_and_empty_tag_fields_deserialize_differently() {
        let absent: PatchRecipeRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert!(absent.tags.is_none());

        let empty: PatchRecipeRequest = serde_json::from_str(r#"{"tags":[]}"#).unwrap();
        assert_eq!(empty.tags.map(|t| t.len()), Some(0));
    }
}
