//! Contact routes. Every endpoint is protected and scoped to the caller.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    routing::get,
};

use crate::auth::middleware::AuthMiddleware;
use crate::database::models::User;
use crate::error::ApiResult;
use crate::routes::extract::{AppJson, AppQuery};
use crate::server::AppState;
use crate::state_structs::{ContactRequest, ContactResponse, SearchContactQuery, WebResponse};

/// `POST /api/contacts`
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(payload): AppJson<ContactRequest>,
) -> ApiResult<Json<WebResponse<ContactResponse>>> {
    let contact = state.contacts.create(&user, payload).await?;
    Ok(Json(WebResponse::data(contact)))
}

/// `GET /api/contacts/{id}`
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<WebResponse<ContactResponse>>> {
    let contact = state.contacts.get(&user, &id).await?;
    Ok(Json(WebResponse::data(contact)))
}

/// `PUT /api/contacts/{id}`
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ContactRequest>,
) -> ApiResult<Json<WebResponse<ContactResponse>>> {
    let contact = state.contacts.update(&user, &id, payload).await?;
    Ok(Json(WebResponse::data(contact)))
}

/// `DELETE /api/contacts/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<WebResponse<String>>> {
    state.contacts.delete(&user, &id).await?;
    Ok(Json(WebResponse::ok()))
}

/// `GET /api/contacts?name=&email=&phone=&page=&size=`
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppQuery(query): AppQuery<SearchContactQuery>,
) -> ApiResult<Json<WebResponse<Vec<ContactResponse>>>> {
    let (contacts, paging) = state.contacts.search(&user, query).await?;
    Ok(Json(WebResponse::paged(contacts, paging)))
}

pub fn create_contact_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/contacts", get(search).post(create))
        .route("/api/contacts/{id}", get(get_contact).put(update).delete(remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), AuthMiddleware::validate_token))
}
