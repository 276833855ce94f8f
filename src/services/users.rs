//! User Service
//!
//! Registration and self-service profile management.

use std::sync::Arc;

use crate::auth::password::{self, CredentialHasher};
use crate::database::models::User;
use crate::database::store::{Store, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::services::validation::Violations;
use crate::state_structs::{RegisterUserRequest, UpdateUserRequest, UserResponse};

pub struct UserService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> ApiResult<()> {
        Violations::new()
            .required("username", request.username.as_deref())
            .required("password", request.password.as_deref())
            .required("name", request.name.as_deref())
            .finish()?;

        let (Some(username), Some(password), Some(name)) =
            (request.username, request.password, request.name)
        else {
            return Err(ApiError::validation("username, password and name are required"));
        };

        if self.store.find_user(&username).await?.is_some() {
            return Err(ApiError::Conflict("Username already registered".to_string()));
        }

        let password_hash = password::hash_password(self.hasher.clone(), password).await?;
        let user = User::new(username, password_hash, name);

        match self.store.insert_user(&user).await {
            Ok(()) => {
                tracing::info!(username = %user.username, "user registered");
                Ok(())
            }
            // lost a race with a concurrent registration
            Err(StoreError::Duplicate(_)) => {
                Err(ApiError::Conflict("Username already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, user: &User) -> UserResponse {
        UserResponse::from(user)
    }

    /// Partial update: absent fields are left untouched.
    pub async fn update(&self, user: &User, request: UpdateUserRequest) -> ApiResult<UserResponse> {
        Violations::new()
            .not_blank_if_present("name", request.name.as_deref())
            .not_blank_if_present("password", request.password.as_deref())
            .finish()?;

        let mut updated = user.clone();
        if let Some(name) = request.name {
            updated.name = name;
        }
        if let Some(password) = request.password {
            updated.password_hash = password::hash_password(self.hasher.clone(), password).await?;
        }

        self.store.update_profile(&updated).await?;
        tracing::info!(username = %updated.username, "user profile updated");

        Ok(UserResponse::from(&updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::test_hasher;
    use crate::database::memory::MemoryStore;
    use crate::database::store::UserStore;

    fn service() -> (Arc<MemoryStore>, Arc<dyn CredentialHasher>, UserService) {
        let store = Arc::new(MemoryStore::new());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(test_hasher());
        let service = UserService::new(store.clone(), hasher.clone());
        (store, hasher, service)
    }

    fn register_request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: Some(username.into()),
            password: Some("rahasia".into()),
            name: Some("Test".into()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let (store, hasher, service) = service();
        service.register(register_request("test")).await.unwrap();

        let user = store.find_user("test").await.unwrap().unwrap();
        assert_eq!(user.name, "Test");
        assert_ne!(user.password_hash, "rahasia");
        assert!(hasher.verify("rahasia", &user.password_hash));
        assert_eq!(user.token, None);
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let (_, _, service) = service();
        service.register(register_request("test")).await.unwrap();
        assert!(matches!(
            service.register(register_request("test")).await,
            Err(ApiError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let (store, _, service) = service();
        let request = RegisterUserRequest {
            username: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(service.register(request).await, Err(ApiError::Validation(_))));
        assert!(store.find_user("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (store, hasher, service) = service();
        service.register(register_request("test")).await.unwrap();
        let user = store.find_user("test").await.unwrap().unwrap();

        let response = service
            .update(&user, UpdateUserRequest { name: Some("Budi".into()), password: None })
            .await
            .unwrap();
        assert_eq!(response, UserResponse { username: "test".into(), name: "Budi".into() });

        let stored = store.find_user("test").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, user.password_hash);

        service
            .update(&stored, UpdateUserRequest { name: None, password: Some("baru".into()) })
            .await
            .unwrap();
        let stored = store.find_user("test").await.unwrap().unwrap();
        assert_eq!(stored.name, "Budi");
        assert!(hasher.verify("baru", &stored.password_hash));
    }
}
