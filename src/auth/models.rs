//! Authentication Models
//!
//! Request and response bodies for the login endpoint.

use serde::{Deserialize, Serialize};

use crate::auth::session::IssuedToken;

/// Login request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token response after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    /// Epoch milliseconds
    pub expired_at: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expired_at: issued.expired_at,
        }
    }
}
