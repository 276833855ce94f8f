//! Auth routes for login and logout

use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{delete, post},
};

use crate::auth::middleware::AuthMiddleware;
use crate::auth::models::{LoginRequest, TokenResponse};
use crate::database::models::User;
use crate::error::{ApiError, ApiResult};
use crate::routes::extract::AppJson;
use crate::server::AppState;
use crate::services::validation::Violations;
use crate::state_structs::WebResponse;

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<Json<WebResponse<TokenResponse>>> {
    Violations::new()
        .required("username", payload.username.as_deref())
        .required("password", payload.password.as_deref())
        .finish()?;

    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(ApiError::validation("username and password are required"));
    };

    let issued = state.sessions.login(&username, &password).await?;
    Ok(Json(WebResponse::data(issued.into())))
}

/// `DELETE /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<WebResponse<String>>> {
    state.sessions.logout(&user).await?;
    Ok(Json(WebResponse::ok()))
}

pub fn create_auth_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/logout", delete(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), AuthMiddleware::validate_token));

    Router::new()
        .route("/api/auth/login", post(login))
        .merge(protected)
}
