//! # Memory Store
//!
//! In-process [`Store`](crate::database::store::Store) used when no
//! `DATABASE_URL` is configured, and by the test suite. Each call holds one
//! lock for its whole read-modify-write, which gives the same per-row
//! atomicity the Postgres backend gets from single statements.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::database::models::{Contact, User};
use crate::database::store::{ContactStore, StoreError, StoreResult, UserStore};
use crate::services::contact_query::ContactQuery;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    // BTreeMap keeps contacts ordered by id for stable paging
    contacts: RwLock<BTreeMap<String, Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(StoreError::Duplicate(format!("users.username={}", user.username)));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> StoreResult<()> {
        if let Some(stored) = self.users.write().get_mut(&user.username) {
            stored.name = user.name.clone();
            stored.password_hash = user.password_hash.clone();
        }
        Ok(())
    }

    async fn set_token(&self, username: &str, token: &str, expires_at: i64) -> StoreResult<()> {
        if let Some(stored) = self.users.write().get_mut(username) {
            stored.token = Some(token.to_string());
            stored.token_expired_at = Some(expires_at);
        }
        Ok(())
    }

    async fn clear_token(&self, username: &str, token: &str) -> StoreResult<bool> {
        let mut users = self.users.write();
        match users.get_mut(username) {
            Some(stored) if stored.token.as_deref() == Some(token) => {
                stored.token = None;
                stored.token_expired_at = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert_contact(&self, contact: &Contact) -> StoreResult<()> {
        let mut contacts = self.contacts.write();
        if contacts.contains_key(&contact.id) {
            return Err(StoreError::Duplicate(format!("contacts.id={}", contact.id)));
        }
        contacts.insert(contact.id.clone(), contact.clone());
        Ok(())
    }

    async fn find_contact(&self, owner: &str, id: &str) -> StoreResult<Option<Contact>> {
        Ok(self
            .contacts
            .read()
            .get(id)
            .filter(|c| c.owner == owner)
            .cloned())
    }

    async fn update_contact(&self, contact: &Contact) -> StoreResult<bool> {
        let mut contacts = self.contacts.write();
        match contacts.get_mut(&contact.id) {
            Some(stored) if stored.owner == contact.owner => {
                stored.first_name = contact.first_name.clone();
                stored.last_name = contact.last_name.clone();
                stored.email = contact.email.clone();
                stored.phone = contact.phone.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_contact(&self, owner: &str, id: &str) -> StoreResult<bool> {
        let mut contacts = self.contacts.write();
        let owned = contacts.get(id).is_some_and(|c| c.owner == owner);
        if owned {
            contacts.remove(id);
        }
        Ok(owned)
    }

    async fn search_contacts(&self, query: &ContactQuery) -> StoreResult<(Vec<Contact>, u64)> {
        let contacts = self.contacts.read();
        let predicate = query.predicate();
        let page = query.page();

        let matching: Vec<&Contact> = contacts.values().filter(|c| predicate.matches(c)).collect();
        let total = matching.len() as u64;

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let rows = matching.into_iter().skip(offset).take(limit).cloned().collect();

        Ok((rows, total))
    }
}
