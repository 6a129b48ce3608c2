use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::SqlitePool;

use crate::db::models::User;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{Claims, RegisterRequest, TokenRequest, TokenResponse, UserResponse};

/// Minimum accepted password length, enforced on signup and profile update.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(format!("Password hashing failed: {e}")))
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(AppError::InvalidInput("Enter a valid email address.".to_string()));
    }
    Ok(())
}

/// Signup: validates the payload, rejects duplicate emails, stores the
/// hashed password. Nothing secret is echoed back.
pub async fn register_user(
    pool: &SqlitePool,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let existing = user_service::get_user_by_email(pool, &req.email).await?;
    if existing.is_some() {
        return Err(AppError::InvalidInput(
            "A user with this email already exists.".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = user_service::create_user(pool, &req.email, &req.name, &password_hash).await?;

    Ok(UserResponse {
        email: user.email,
        name: user.name,
    })
}

/// Exchanges email + password for a bearer token. Any failure surfaces as a
/// 400 without a token key, so callers cannot probe which part was wrong.
pub async fn issue_token(
    pool: &SqlitePool,
    req: TokenRequest,
    jwt_secret: &str,
) -> Result<TokenResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadCredentials);
    }

    let user = user_service::get_user_by_email(pool, &req.email)
        .await?
        .ok_or(AppError::BadCredentials)?;

    let valid = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::BadCredentials);
    }

    create_token_for_user(&user, jwt_secret)
}

pub fn create_token_for_user(user: &User, jwt_secret: &str) -> Result<TokenResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(format!("Token creation failed: {e}")))?;

    Ok(TokenResponse { token })
}
