//! Password Hashing
//!
//! Salted one-way hashing behind [`CredentialHasher`], backed by Argon2id.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// One-way salted hash + verify.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    /// False for a wrong password and for an unparseable stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Argon2id with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self.argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is unparseable: {}", e);
                false
            }
        }
    }
}

/// Hash on the blocking pool so request workers are not stalled.
pub async fn hash_password(hasher: Arc<dyn CredentialHasher>, password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
}

/// Verify on the blocking pool.
pub async fn verify_password(
    hasher: Arc<dyn CredentialHasher>,
    password: String,
    stored_hash: String,
) -> Result<bool> {
    Ok(tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await?)
}

#[cfg(test)]
pub(crate) fn test_hasher() -> Argon2Hasher {
    // minimum cost keeps the suite fast
    Argon2Hasher::with_params(Params::new(8, 1, 1, None).expect("valid argon2 params"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let hash = hasher.hash("rahasia").unwrap();

        assert_ne!(hash, "rahasia");
        assert!(hasher.verify("rahasia", &hash));
        assert!(!hasher.verify("salah", &hash));
    }

    #[test]
    fn test_salted() {
        let hasher = test_hasher();
        assert_ne!(hasher.hash("rahasia").unwrap(), hasher.hash("rahasia").unwrap());
    }

    #[test]
    fn test_garbage_hash_does_not_verify() {
        assert!(!test_hasher().verify("rahasia", "not-a-phc-string"));
    }
}
