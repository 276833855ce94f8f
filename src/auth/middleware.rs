//! Authentication Middleware
//!
//! Authorization gate for protected routes: resolves the caller from the
//! `X-API-TOKEN` header and injects the [`User`] into request extensions.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::auth::session::SessionManager;
use crate::database::models::User;
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

pub const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// Authentication middleware that validates session tokens and injects the user
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Middleware function for protected routes
    pub async fn validate_token(
        State(state): State<AppState>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, ApiError> {
        let header = req.headers().get(API_TOKEN_HEADER).cloned();
        let user = match resolve_principal(&state.sessions, header.as_ref()).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("[AuthMiddleware] {} {} rejected: {}", req.method(), req.uri(), e);
                return Err(e);
            }
        };
        tracing::debug!("[AuthMiddleware] {} {} as {}", req.method(), req.uri(), user.username);

        req.extensions_mut().insert(user);
        Ok(next.run(req).await)
    }
}

/// Missing, empty or non-ASCII header values never reach the store.
pub async fn resolve_principal(
    sessions: &SessionManager,
    header: Option<&HeaderValue>,
) -> ApiResult<User> {
    let token = header
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    sessions.validate(token).await
}
