// --- Wire shapes shared by the route handlers ---
use serde::{Deserialize, Serialize};

use crate::database::models::{Contact, User};
use crate::services::pagination::Paging;

/// Response envelope. `data` and `errors` are never both set; `paging` only
/// appears on list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> WebResponse<T> {
    pub fn data(data: T) -> Self {
        Self { data: Some(data), errors: None, paging: None }
    }

    pub fn paged(data: T, paging: Paging) -> Self {
        Self { data: Some(data), errors: None, paging: Some(paging) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { data: None, errors: Some(message.into()), paging: None }
    }
}

impl WebResponse<String> {
    /// `{ "data": "OK" }`
    pub fn ok() -> Self {
        Self::data("OK".to_string())
    }
}

// --- Request structs ---
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Query string of `GET /api/contacts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchContactQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

// --- Response structs ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}
