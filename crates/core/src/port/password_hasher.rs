// Password Hashing Port

use crate::error::Result;

/// One-way, salted password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext secret; every call uses a fresh salt
    fn hash(&self, secret: &str) -> Result<String>;

    /// Verify a plaintext secret against a stored hash
    ///
    /// Implementations must compare in constant time. A malformed stored hash
    /// is an error, a mismatch is `Ok(false)`.
    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Reversible "hash" for fast tests. NOT a real hash.
    #[derive(Default)]
    pub struct MockPasswordHasher {
        salt_counter: AtomicU64,
    }

    impl MockPasswordHasher {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl PasswordHasher for MockPasswordHasher {
        fn hash(&self, secret: &str) -> Result<String> {
            let salt = self.salt_counter.fetch_add(1, Ordering::SeqCst);
            let reversed: String = secret.chars().rev().collect();
            Ok(format!("$mock${}${}", salt, reversed))
        }

        fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool> {
            let mut parts = stored_hash.splitn(4, '$');
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(""), Some("mock"), Some(_salt), Some(reversed)) => {
                    Ok(reversed.chars().rev().collect::<String>() == secret)
                }
                _ => Err(AppError::Internal("Invalid mock hash format".to_string())),
            }
        }
    }
}
