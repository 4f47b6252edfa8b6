//! Request extractors
//!
//! [`AppJson`] replaces `axum::Json` on the request side so body
//! deserialization failures (malformed JSON, unknown enum values) come
//! back in the same `AppResponse` envelope as every other validation
//! error, instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::utils::AppError;

/// JSON body extractor with the application error envelope
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}
