use chrono::Utc;
use sqlx::{Result, SqlitePool};

use crate::db::models::{Recipe, Tag};
use crate::db::services::tag_service;

// --- Recipe Service Functions ---

/// Scalar fields for a new recipe, plus the requested tag names.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// A full replacement (PUT). Optional scalars are written as given, so an
/// omitted link or description resets to NULL; `tags` keeps the
/// present/absent distinction of a partial update.
#[derive(Debug, Clone)]
pub struct RecipeReplacement {
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A partial update. `None` scalars keep their current value; `tags: None`
/// leaves the association set untouched, while `Some(vec![])` clears it.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price, link, description, created_at, updated_at";

/// Creates a recipe and attaches its tags in a single transaction. Tag names
/// are resolved through the per-user registry; duplicate names in the request
/// collapse to one association.
pub async fn create_recipe(
    pool: &SqlitePool,
    user_id: i64,
    new_recipe: NewRecipe,
) -> Result<(Recipe, Vec<Tag>)> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (user_id, title, time_minutes, price, link, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RECIPE_COLUMNS}
        "#,
    ))
    .bind(user_id)
    .bind(&new_recipe.title)
    .bind(new_recipe.time_minutes)
    .bind(&new_recipe.price)
    .bind(&new_recipe.link)
    .bind(&new_recipe.description)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    attach_tags(&mut tx, user_id, recipe.id, &new_recipe.tags).await?;
    tx.commit().await?;

    let tags = tag_service::get_tags_for_recipe(pool, recipe.id).await?;
    Ok((recipe, tags))
}

/// Retrieves all recipes for a user, newest first, each with its tags.
pub async fn get_recipes_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<(Recipe, Vec<Tag>)>> {
    let recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = ? ORDER BY id DESC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    // Small per-user lists; a query per recipe keeps this readable.
    let mut result = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let tags = tag_service::get_tags_for_recipe(pool, recipe.id).await?;
        result.push((recipe, tags));
    }
    Ok(result)
}

/// Retrieves one recipe scoped to its owner. Returns `None` both for missing
/// ids and for recipes owned by someone else.
pub async fn get_recipe_for_user(
    pool: &SqlitePool,
    recipe_id: i64,
    user_id: i64,
) -> Result<Option<(Recipe, Vec<Tag>)>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ? AND user_id = ?",
    ))
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match recipe {
        Some(recipe) => {
            let tags = tag_service::get_tags_for_recipe(pool, recipe.id).await?;
            Ok(Some((recipe, tags)))
        }
        None => Ok(None),
    }
}

/// Applies a partial update to an owned recipe. When `changes.tags` is
/// present all existing associations are dropped and the requested names are
/// resolved and re-attached; the update and the reconciliation share one
/// transaction. Returns `None` when the recipe is missing or not owned.
pub async fn update_recipe(
    pool: &SqlitePool,
    recipe_id: i64,
    user_id: i64,
    changes: RecipeChanges,
) -> Result<Option<(Recipe, Vec<Tag>)>> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET title = COALESCE(?, title),
            time_minutes = COALESCE(?, time_minutes),
            price = COALESCE(?, price),
            link = COALESCE(?, link),
            description = COALESCE(?, description),
            updated_at = ?
        WHERE id = ? AND user_id = ?
        RETURNING {RECIPE_COLUMNS}
        "#,
    ))
    .bind(&changes.title)
    .bind(changes.time_minutes)
    .bind(&changes.price)
    .bind(&changes.link)
    .bind(&changes.description)
    .bind(now)
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(recipe) = recipe else {
        tx.rollback().await?;
        return Ok(None);
    };

    if let Some(tag_names) = &changes.tags {
        // Detach everything first; the Tag rows themselves are never deleted.
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, user_id, recipe.id, tag_names).await?;
    }

    tx.commit().await?;

    let tags = tag_service::get_tags_for_recipe(pool, recipe.id).await?;
    Ok(Some((recipe, tags)))
}

/// Replaces every scalar field of an owned recipe. Unlike `update_recipe`
/// the optional scalars are bound directly, so values absent from the
/// request become NULL. Tag handling is shared with the partial path.
/// Returns `None` when the recipe is missing or not owned.
pub async fn replace_recipe(
    pool: &SqlitePool,
    recipe_id: i64,
    user_id: i64,
    replacement: RecipeReplacement,
) -> Result<Option<(Recipe, Vec<Tag>)>> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET title = ?,
            time_minutes = ?,
            price = ?,
            link = ?,
            description = ?,
            updated_at = ?
        WHERE id = ? AND user_id = ?
        RETURNING {RECIPE_COLUMNS}
        "#,
    ))
    .bind(&replacement.title)
    .bind(replacement.time_minutes)
    .bind(&replacement.price)
    .bind(&replacement.link)
    .bind(&replacement.description)
    .bind(now)
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(recipe) = recipe else {
        tx.rollback().await?;
        return Ok(None);
    };

    if let Some(tag_names) = &replacement.tags {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, user_id, recipe.id, tag_names).await?;
    }

    tx.commit().await?;

    let tags = tag_service::get_tags_for_recipe(pool, recipe.id).await?;
    Ok(Some((recipe, tags)))
}

/// Deletes an owned recipe; associations go with it via ON DELETE CASCADE.
/// Returns the number of rows removed (0 when missing or not owned).
pub async fn delete_recipe(pool: &SqlitePool, recipe_id: i64, user_id: i64) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
        .bind(recipe_id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

/// Resolves each requested name through the tag registry and inserts the
/// association. `INSERT OR IGNORE` makes repeated names a no-op on top of
/// the registry's own idempotence.
async fn attach_tags(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    recipe_id: i64,
    tag_names: &[String],
) -> Result<()> {
    for name in tag_names {
        let tag = tag_service::get_or_create_tag(&mut *tx, user_id, name).await?;
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag.id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
