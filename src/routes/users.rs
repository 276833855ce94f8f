//! User routes: registration and the caller's own profile

use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};

use crate::auth::middleware::AuthMiddleware;
use crate::database::models::User;
use crate::error::ApiResult;
use crate::routes::extract::AppJson;
use crate::server::AppState;
use crate::state_structs::{RegisterUserRequest, UpdateUserRequest, UserResponse, WebResponse};

/// `POST /api/users`
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterUserRequest>,
) -> ApiResult<Json<WebResponse<String>>> {
    state.users.register(payload).await?;
    Ok(Json(WebResponse::ok()))
}

/// `GET /api/users/current`
pub async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Json<WebResponse<UserResponse>> {
    Json(WebResponse::data(state.users.get(&user)))
}

/// `PATCH /api/users/current`
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> ApiResult<Json<WebResponse<UserResponse>>> {
    let updated = state.users.update(&user, payload).await?;
    Ok(Json(WebResponse::data(updated)))
}

pub fn create_user_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/users/current", get(current).patch(update))
        .route_layer(middleware::from_fn_with_state(state.clone(), AuthMiddleware::validate_token));

    Router::new()
        .route("/api/users", post(register))
        .merge(protected)
}
