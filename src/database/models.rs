// Database Models
//
// Tokio-postgres compatible rows for the two persisted entities: users (which
// also carry the active session token) and their contacts.

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> where Self: Sized;
}

// ============================================================================
// USER & SESSION
// ============================================================================

/// User account. The session lives on the same row: `token` is set while the
/// user holds an active session and `token_expired_at` is its expiry in epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub token: Option<String>,
    pub token_expired_at: Option<i64>,
}

impl User {
    /// Fresh account without a session.
    pub fn new(username: String, password_hash: String, name: String) -> Self {
        Self {
            username,
            password_hash,
            name,
            token: None,
            token_expired_at: None,
        }
    }

    /// True when the stored expiry is at or before `now_millis`.
    /// A user without an expiry is treated as expired.
    pub fn is_token_expired(&self, now_millis: i64) -> bool {
        match self.token_expired_at {
            Some(expires_at) => expires_at <= now_millis,
            None => true,
        }
    }
}

impl FromRow for User {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            username: row.try_get("username")?,
            password_hash: row.try_get("password")?,
            name: row.try_get("name")?,
            token: row.try_get("token")?,
            token_expired_at: row.try_get("token_expired_at")?,
        })
    }
}

// ============================================================================
// CONTACTS
// ============================================================================

/// Contact record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub owner: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl FromRow for Contact {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry_boundary() {
        let mut user = User::new("test".into(), "hash".into(), "Test".into());
        assert!(user.is_token_expired(0));

        user.token = Some("abc".into());
        user.token_expired_at = Some(1_000);
        assert!(!user.is_token_expired(999));
        assert!(user.is_token_expired(1_000));
        assert!(user.is_token_expired(1_001));
    }
}
