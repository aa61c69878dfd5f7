// Credential Repository Port (Interface)

use crate::domain::{Credential, CredentialId, NewCredential};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for employee credentials
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Create the backing table if it does not exist
    async fn initialize_schema(&self) -> Result<()>;

    /// Hash the secret and insert a new credential
    ///
    /// Any store failure (including a duplicate username) rolls the
    /// transaction back and is returned as an error.
    async fn insert(&self, record: &NewCredential) -> Result<CredentialId>;

    /// Verify `secret` against the stored hash for `username`
    ///
    /// Unknown usernames yield `Ok(false)`.
    async fn authenticate(&self, username: &str, secret: &str) -> Result<bool>;

    /// Find credential by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory credential store; stores the secret verbatim (tests only)
    #[derive(Default)]
    pub struct InMemoryCredentialRepository {
        rows: Mutex<Vec<Credential>>,
    }

    impl InMemoryCredentialRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl CredentialRepository for InMemoryCredentialRepository {
        async fn initialize_schema(&self) -> Result<()> {
            Ok(())
        }

        async fn insert(&self, record: &NewCredential) -> Result<CredentialId> {
            record.validate()?;
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|c| c.username == record.username) {
                return Err(AppError::Constraint(format!(
                    "username {} already exists",
                    record.username
                )));
            }
            let id = rows.len() as CredentialId + 1;
            rows.push(Credential {
                id,
                username: record.username.clone(),
                password_hash: record.password.clone(),
                email: record.email.clone(),
            });
            Ok(id)
        }

        async fn authenticate(&self, username: &str, secret: &str) -> Result<bool> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.username == username && c.password_hash == secret))
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Credential>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.username == username)
                .cloned())
        }
    }
}
