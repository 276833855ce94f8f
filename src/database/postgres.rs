//! # Postgres Store
//!
//! [`Store`](crate::database::store::Store) over a deadpool-postgres pool.
//! Each operation is one statement, so row-level atomicity comes from
//! Postgres itself.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;

use crate::database::models::{Contact, FromRow, User};
use crate::database::store::{ContactStore, StoreError, StoreResult, UserStore};
use crate::services::contact_query::ContactQuery;

const USER_COLUMNS: &str = "username, password, name, token, token_expired_at";
const CONTACT_COLUMNS: &str = "id, username, first_name, last_name, email, phone";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn decode<T: FromRow>(row: &tokio_postgres::Row) -> StoreResult<T> {
    T::from_row(row).map_err(StoreError::from)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = client.query_opt(&sql, &[&username]).await?;
        row.as_ref().map(decode).transpose()
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE token = $1");
        let row = client.query_opt(&sql, &[&token]).await?;
        row.as_ref().map(decode).transpose()
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let client = self.pool.get().await?;
        let inserted = client
            .execute(
                "INSERT INTO users (username, password, name) VALUES ($1, $2, $3) \
                 ON CONFLICT (username) DO NOTHING",
                &[&user.username, &user.password_hash, &user.name],
            )
            .await?;
        if inserted == 0 {
            return Err(StoreError::Duplicate(format!("users.username={}", user.username)));
        }
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "UPDATE users SET name = $1, password = $2 WHERE username = $3",
                &[&user.name, &user.password_hash, &user.username],
            )
            .await?;
        Ok(())
    }

    async fn set_token(&self, username: &str, token: &str, expires_at: i64) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "UPDATE users SET token = $1, token_expired_at = $2 WHERE username = $3",
                &[&token, &expires_at, &username],
            )
            .await?;
        Ok(())
    }

    async fn clear_token(&self, username: &str, token: &str) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let cleared = client
            .execute(
                "UPDATE users SET token = NULL, token_expired_at = NULL \
                 WHERE username = $1 AND token = $2",
                &[&username, &token],
            )
            .await?;
        Ok(cleared > 0)
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn insert_contact(&self, contact: &Contact) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO contacts (id, username, first_name, last_name, email, phone) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &contact.id,
                    &contact.owner,
                    &contact.first_name,
                    &contact.last_name,
                    &contact.email,
                    &contact.phone,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_contact(&self, owner: &str, id: &str) -> StoreResult<Option<Contact>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND username = $2");
        let row = client.query_opt(&sql, &[&id, &owner]).await?;
        row.as_ref().map(decode).transpose()
    }

    async fn update_contact(&self, contact: &Contact) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE contacts SET first_name = $1, last_name = $2, email = $3, phone = $4 \
                 WHERE id = $5 AND username = $6",
                &[
                    &contact.first_name,
                    &contact.last_name,
                    &contact.email,
                    &contact.phone,
                    &contact.id,
                    &contact.owner,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn delete_contact(&self, owner: &str, id: &str) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM contacts WHERE id = $1 AND username = $2", &[&id, &owner])
            .await?;
        Ok(deleted > 0)
    }

    async fn search_contacts(&self, query: &ContactQuery) -> StoreResult<(Vec<Contact>, u64)> {
        let client = self.pool.get().await?;

        let mut params: Vec<String> = Vec::new();
        let predicate = query.predicate().to_sql(&mut params);
        let filter_params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let count_sql = format!("SELECT COUNT(*) FROM contacts WHERE {predicate}");
        let count: i64 = client.query_one(&count_sql, &filter_params).await?.try_get(0)?;

        let page = query.page();
        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let page_sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE {predicate} ORDER BY id LIMIT ${} OFFSET ${}",
            params.len() + 1,
            params.len() + 2,
        );
        let mut page_params = filter_params.clone();
        page_params.push(&limit);
        page_params.push(&offset);

        let rows = client.query(&page_sql, &page_params).await?;
        let contacts = rows.iter().map(decode).collect::<StoreResult<Vec<Contact>>>()?;

        Ok((contacts, u64::try_from(count).unwrap_or(0)))
    }
}
