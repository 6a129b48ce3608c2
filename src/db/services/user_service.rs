use chrono::Utc;
use sqlx::{Result, SqlitePool};

use crate::db::models::User;

// --- User Service Functions ---

/// Creates a new user. The caller is responsible for hashing the password.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, email, name, password_hash, created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Looks a user up by email (the account identity).
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, name, password_hash, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, name, password_hash, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Applies a partial profile update. Fields passed as `None` keep their
/// current value.
pub async fn update_user_profile(
    pool: &SqlitePool,
    user_id: i64,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            password_hash = COALESCE(?, password_hash),
            updated_at = ?
        WHERE id = ?
        RETURNING id, email, name, password_hash, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
