//! Contact Service
//!
//! Owner-scoped contact CRUD and search. A contact that exists but belongs to
//! someone else is reported exactly like a missing one.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{Contact, User};
use crate::database::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::services::contact_query::{self, ContactSearch};
use crate::services::pagination::{PageRequest, Paging, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::services::validation::Violations;
use crate::state_structs::{ContactRequest, ContactResponse, SearchContactQuery};

const NOT_FOUND: &str = "Contact not found";

pub struct ContactService {
    store: Arc<dyn Store>,
}

impl ContactService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: &User, request: ContactRequest) -> ApiResult<ContactResponse> {
        let fields = ContactFields::validate(request)?;
        let contact = fields.into_contact(Uuid::new_v4().to_string(), &owner.username);

        self.store.insert_contact(&contact).await?;
        tracing::info!(username = %owner.username, contact_id = %contact.id, "contact created");

        Ok(ContactResponse::from(contact))
    }

    pub async fn get(&self, owner: &User, id: &str) -> ApiResult<ContactResponse> {
        self.store
            .find_contact(&owner.username, id)
            .await?
            .map(ContactResponse::from)
            .ok_or_else(|| ApiError::not_found(NOT_FOUND))
    }

    /// Validation runs before the lookup, so a bad body is a 400 even for an
    /// unknown id.
    pub async fn update(&self, owner: &User, id: &str, request: ContactRequest) -> ApiResult<ContactResponse> {
        let fields = ContactFields::validate(request)?;
        let contact = fields.into_contact(id.to_string(), &owner.username);

        if !self.store.update_contact(&contact).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }
        tracing::info!(username = %owner.username, contact_id = %id, "contact updated");

        Ok(ContactResponse::from(contact))
    }

    pub async fn delete(&self, owner: &User, id: &str) -> ApiResult<()> {
        if !self.store.delete_contact(&owner.username, id).await? {
            return Err(ApiError::not_found(NOT_FOUND));
        }
        tracing::info!(username = %owner.username, contact_id = %id, "contact deleted");
        Ok(())
    }

    pub async fn search(
        &self,
        owner: &User,
        query: SearchContactQuery,
    ) -> ApiResult<(Vec<ContactResponse>, Paging)> {
        let page = PageRequest::new(
            query.page.unwrap_or(i64::from(DEFAULT_PAGE)),
            query.size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE)),
        )
        .map_err(ApiError::Validation)?;

        let search = ContactSearch::new(owner.username.clone())
            .name(query.name)
            .email(query.email)
            .phone(query.phone);

        let result = contact_query::search(self.store.as_ref(), search, page).await?;
        let paging = Paging::new(page, result.total);
        let contacts = result.contacts.into_iter().map(ContactResponse::from).collect();

        Ok((contacts, paging))
    }
}

/// Validated create/update body.
struct ContactFields {
    first_name: String,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl ContactFields {
    fn validate(request: ContactRequest) -> ApiResult<Self> {
        Violations::new()
            .required("firstName", request.first_name.as_deref())
            .max_len("lastName", request.last_name.as_deref())
            .email("email", request.email.as_deref())
            .max_len("phone", request.phone.as_deref())
            .finish()?;

        let first_name = request
            .first_name
            .ok_or_else(|| ApiError::validation("firstName: must not be blank"))?;

        Ok(Self {
            first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
        })
    }

    fn into_contact(self, id: String, owner: &str) -> Contact {
        Contact {
            id,
            owner: owner.to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn user(username: &str) -> User {
        User::new(username.into(), "hash".into(), username.into())
    }

    fn request(first: &str) -> ContactRequest {
        ContactRequest {
            first_name: Some(first.into()),
            last_name: Some("salah".into()),
            email: Some("salah@example.com".into()),
            phone: Some("921838219".into()),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let alice = user("alice");

        let created = service.create(&alice, request("dada")).await.unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());

        let fetched = service.get(&alice, &created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_foreign_contact_is_not_found() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let (alice, bob) = (user("alice"), user("bob"));
        let created = service.create(&alice, request("dada")).await.unwrap();

        assert!(matches!(service.get(&bob, &created.id).await, Err(ApiError::NotFound(_))));
        assert!(matches!(
            service.update(&bob, &created.id, request("hijack")).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(service.delete(&bob, &created.id).await, Err(ApiError::NotFound(_))));

        assert_eq!(service.get(&alice, &created.id).await.unwrap().first_name, "dada");
    }

    #[tokio::test]
    async fn test_invalid_body_beats_unknown_id() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let bad = ContactRequest {
            first_name: Some(String::new()),
            email: Some("salah".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&user("alice"), "123", bad).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_scenario() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let alice = user("alice");
        for i in 0..100 {
            let first = if i < 90 { format!("dada{i}") } else { format!("budi{i}") };
            let mut body = request(&first);
            body.last_name = Some("nana".into());
            service.create(&alice, body).await.unwrap();
        }

        let (page, paging) = service
            .search(&alice, SearchContactQuery { name: Some("dada".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(paging, Paging { current_page: 0, total_page: 9, size: 10 });

        let (page, paging) = service
            .search(
                &alice,
                SearchContactQuery { phone: Some("838".into()), page: Some(1000), ..Default::default() },
            )
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(paging, Paging { current_page: 1000, total_page: 10, size: 10 });

        let (page, paging) = service
            .search(&user("bob"), SearchContactQuery::default())
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(paging.total_page, 0);
    }

    #[tokio::test]
    async fn test_search_rejects_bad_page_window() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let query = SearchContactQuery { size: Some(0), ..Default::default() };
        assert!(matches!(
            service.search(&user("alice"), query).await,
            Err(ApiError::Validation(_))
        ));
    }
}
