// Argon2id PasswordHasher Implementation

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use orderdesk_core::error::{AppError, Result};
use orderdesk_core::port::PasswordHasher;
use tracing::debug;

/// Salted Argon2id hashing in PHC string format
///
/// Every hash gets a fresh random salt, so equal secrets never produce
/// equal stored values.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Argon2id with the crate defaults (19 MiB, 2 iterations, 1 lane)
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with explicit cost parameters
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash secret: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::Internal(format!("Stored hash is malformed: {}", e)))?;

        let matches = self
            .argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok();
        debug!(matches, "Verified secret");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fast, insecure parameters for tests only
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_phc_string_not_plaintext() {
        let hash = hasher().hash("s3cret").unwrap();

        assert_ne!(hash, "s3cret");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").unwrap();

        assert!(hasher.verify("s3cret", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = hasher();
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same", &first).unwrap());
        assert!(hasher.verify("same", &second).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let result = hasher().verify("s3cret", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2PasswordHasher::with_params(1, 1, 1);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
