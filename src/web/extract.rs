use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::web::error::AppError;

/// `axum::Json` with this API's error shape: a malformed or incomplete body
/// answers 400 with `{"error": ...}` instead of axum's plain-text 422.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}
