//! Authentication middleware
//!
//! 验证成功后将 [`CurrentUser`] 注入请求扩展
//! (`req.extensions_mut().insert(user)`)。

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

/// Require a valid Bearer token on the request.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.jwt.verify(token)?;
    req.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(req).await)
}
