//! # Store
//!
//! Persistence seam for users and contacts. Every method is a single bounded
//! round trip; row-level atomicity is the backend's job.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Contact, User};
use crate::services::contact_query::ContactQuery;

/// Persistence failures, kept apart from the request-level error taxonomy.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Pool exhausted or database unreachable. Safe to retry.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Query failed: {0}")]
    Query(String),
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return StoreError::Unavailable(err.to_string());
        }
        match err.code() {
            Some(code) if *code == tokio_postgres::error::SqlState::UNIQUE_VIOLATION => {
                StoreError::Duplicate(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] when the username is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Writes `name` and `password_hash` only; session columns are untouched.
    async fn update_profile(&self, user: &User) -> StoreResult<()>;

    /// Overwrites the session columns (last writer wins).
    async fn set_token(&self, username: &str, token: &str, expires_at: i64) -> StoreResult<()>;

    /// Clears the session columns if the stored token is still `token`.
    /// Returns whether anything was cleared.
    async fn clear_token(&self, username: &str, token: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact(&self, contact: &Contact) -> StoreResult<()>;

    /// Only returns the contact if `owner` owns it.
    async fn find_contact(&self, owner: &str, id: &str) -> StoreResult<Option<Contact>>;

    /// Updates by `(id, owner)`. Returns false if no owned row matched.
    async fn update_contact(&self, contact: &Contact) -> StoreResult<bool>;

    /// Deletes by `(id, owner)`. Returns false if no owned row matched.
    async fn delete_contact(&self, owner: &str, id: &str) -> StoreResult<bool>;

    /// One page of matches ordered by id, plus the total match count.
    async fn search_contacts(&self, query: &ContactQuery) -> StoreResult<(Vec<Contact>, u64)>;
}

/// Full persistence collaborator used by the application state.
pub trait Store: UserStore + ContactStore {}

impl<T: UserStore + ContactStore> Store for T {}
