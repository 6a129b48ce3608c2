use chrono::Utc;
use sqlx::{Result, SqliteConnection, SqlitePool};

use crate::db::models::Tag;

// --- Tag Service Functions ---

/// Returns the tag named `name` for this user, creating it first if it does
/// not exist yet. The upsert rides on the UNIQUE (user_id, name) constraint,
/// so concurrent callers and repeated names within one reconciliation pass
/// all resolve to the same row. Names are matched exactly; no trimming or
/// case folding happens here.
pub async fn get_or_create_tag(
    conn: &mut SqliteConnection,
    user_id: i64,
    name: &str,
) -> Result<Tag> {
    let now = Utc::now();
    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (user_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, name) DO UPDATE SET name = excluded.name
        RETURNING id, user_id, name, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
}

/// Retrieves all tags owned by a user, sorted by name.
pub async fn get_tags_by_user_id(pool: &SqlitePool, user_id: i64) -> Result<Vec<Tag>> {
    sqlx::query_as::<_, Tag>(
        "SELECT id, user_id, name, created_at, updated_at FROM tags WHERE user_id = ? ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Retrieves the tags attached to a single recipe, sorted by name.
pub async fn get_tags_for_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<Vec<Tag>> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.user_id, t.name, t.created_at, t.updated_at
        FROM tags t
        INNER JOIN recipe_tags rt ON rt.tag_id = t.id
        WHERE rt.recipe_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
}
