//! Session Manager
//!
//! Issues, validates and invalidates opaque session tokens. The session is
//! stored on the user row itself, so each user has at most one live token:
//! a new login overwrites the previous one.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::auth::password::{self, CredentialHasher};
use crate::database::models::User;
use crate::database::store::Store;
use crate::error::{ApiError, ApiResult};

/// Token handed back on login. `expired_at` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expired_at: i64,
}

pub struct SessionManager {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>, ttl: Duration) -> Self {
        Self { store, hasher, ttl }
    }

    /// Verify credentials and start a new session, replacing any previous one.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<IssuedToken> {
        let user = match self.store.find_user(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %username, "login rejected: unknown user");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let verified = password::verify_password(
            self.hasher.clone(),
            password.to_string(),
            user.password_hash.clone(),
        )
        .await?;
        if !verified {
            tracing::warn!(username = %username, "login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = generate_token();
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let expired_at = now_millis().saturating_add(ttl_millis);

        self.store.set_token(&user.username, &token, expired_at).await?;
        tracing::info!(username = %user.username, expired_at, "session issued");

        Ok(IssuedToken { token, expired_at })
    }

    /// End the caller's session. Calling it without a live session is a no-op.
    pub async fn logout(&self, user: &User) -> ApiResult<()> {
        if let Some(token) = user.token.as_deref() {
            let cleared = self.store.clear_token(&user.username, token).await?;
            tracing::info!(username = %user.username, cleared, "session closed");
        }
        Ok(())
    }

    /// Resolve the user holding `token`. An expired token is cleared on
    /// detection and rejected; later uses find nothing and are rejected too.
    pub async fn validate(&self, token: &str) -> ApiResult<User> {
        let user = self
            .store
            .find_user_by_token(token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if user.is_token_expired(now_millis()) {
            self.store.clear_token(&user.username, token).await?;
            tracing::info!(username = %user.username, "expired session cleared");
            return Err(ApiError::Unauthorized);
        }

        Ok(user)
    }
}

/// 256 bits from the OS RNG, base64url without padding.
fn generate_token() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::test_hasher;
    use crate::database::memory::MemoryStore;
    use crate::database::store::UserStore;

    async fn setup() -> (Arc<MemoryStore>, SessionManager) {
        let store = Arc::new(MemoryStore::new());
        let hasher = test_hasher();
        let hash = hasher.hash("rahasia").unwrap();
        store
            .insert_user(&User::new("test".into(), hash, "Test".into()))
            .await
            .unwrap();

        let sessions = SessionManager::new(store.clone(), Arc::new(hasher), Duration::from_secs(3600));
        (store, sessions)
    }

    #[tokio::test]
    async fn test_login_issues_token_with_expiry() {
        let (store, sessions) = setup().await;
        let before = now_millis();
        let issued = sessions.login("test", "rahasia").await.unwrap();

        assert!(!issued.token.is_empty());
        assert!(issued.expired_at >= before + 3_600_000);

        let stored = store.find_user("test").await.unwrap().unwrap();
        assert_eq!(stored.token.as_deref(), Some(issued.token.as_str()));
        assert_eq!(stored.token_expired_at, Some(issued.expired_at));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (_, sessions) = setup().await;
        assert!(matches!(
            sessions.login("test", "salah").await,
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("nobody", "rahasia").await,
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_relogin_supersedes_previous_token() {
        let (_, sessions) = setup().await;
        let first = sessions.login("test", "rahasia").await.unwrap();
        let second = sessions.login("test", "rahasia").await.unwrap();

        assert_ne!(first.token, second.token);
        assert!(matches!(sessions.validate(&first.token).await, Err(ApiError::Unauthorized)));
        assert_eq!(sessions.validate(&second.token).await.unwrap().username, "test");
    }

    #[tokio::test]
    async fn test_logout_invalidates_and_is_idempotent() {
        let (_, sessions) = setup().await;
        let issued = sessions.login("test", "rahasia").await.unwrap();
        let user = sessions.validate(&issued.token).await.unwrap();

        sessions.logout(&user).await.unwrap();
        sessions.logout(&user).await.unwrap();

        assert!(matches!(sessions.validate(&issued.token).await, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_expired_token_is_cleared_then_stays_rejected() {
        let (store, sessions) = setup().await;
        store.set_token("test", "stale", now_millis() - 1).await.unwrap();

        assert!(matches!(sessions.validate("stale").await, Err(ApiError::Unauthorized)));
        let user = store.find_user("test").await.unwrap().unwrap();
        assert_eq!(user.token, None);
        assert_eq!(user.token_expired_at, None);

        assert!(matches!(sessions.validate("stale").await, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
