// SQLite CredentialRepository Implementation

use async_trait::async_trait;
use orderdesk_core::domain::{Credential, CredentialId, NewCredential};
use orderdesk_core::error::{AppError, Result};
use orderdesk_core::port::{CredentialRepository, PasswordHasher};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::connection::SqliteConnectionManager;
use crate::error::map_sqlx_error;
use crate::migration::{apply_schema, CREDENTIAL_SCHEMA};

pub struct SqliteCredentialRepository {
    manager: Arc<SqliteConnectionManager>,
    hasher: Arc<dyn PasswordHasher>,
}

impl SqliteCredentialRepository {
    pub fn new(manager: Arc<SqliteConnectionManager>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { manager, hasher }
    }

    /// Create the repository and ensure its table exists
    pub async fn bootstrap(
        manager: Arc<SqliteConnectionManager>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let repo = Self::new(manager, hasher);
        if let Err(e) = repo.initialize_schema().await {
            warn!(error = %e, "Could not initialize credential table");
        }
        repo
    }

    /// Hash on the blocking pool; Argon2 is CPU- and memory-heavy
    async fn hash_secret(&self, secret: &str) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_secret(&self, secret: &str, stored_hash: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    async fn initialize_schema(&self) -> Result<()> {
        self.manager
            .transaction("initialize_credential_schema", |session| {
                Box::pin(apply_schema(session, CREDENTIAL_SCHEMA))
            })
            .await?;
        info!("Credential table initialized");
        Ok(())
    }

    async fn insert(&self, record: &NewCredential) -> Result<CredentialId> {
        record.validate()?;

        // Hashing is slow; keep it out of the connection's critical section.
        let password_hash = self.hash_secret(&record.password).await?;

        let id = self
            .manager
            .transaction("insert_credential", |session| {
                let username = record.username.clone();
                let hash = password_hash.clone();
                let email = record.email.clone();
                Box::pin(async move {
                    let result = sqlx::query(
                        "INSERT INTO credentials (username, password_hash, email) VALUES (?, ?, ?)",
                    )
                    .bind(username)
                    .bind(hash)
                    .bind(email)
                    .execute(session.conn())
                    .await
                    .map_err(map_sqlx_error)?;
                    Ok(result.last_insert_rowid())
                })
            })
            .await?;

        info!(credential_id = id, username = %record.username, "Credential created");
        Ok(id)
    }

    async fn authenticate(&self, username: &str, secret: &str) -> Result<bool> {
        let owned = username.to_string();
        let stored: Option<String> = self
            .manager
            .read("authenticate", move |session| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, String>(
                        "SELECT password_hash FROM credentials WHERE username = ?",
                    )
                    .bind(owned)
                    .fetch_optional(session.conn())
                    .await
                    .map_err(map_sqlx_error)
                })
            })
            .await?;

        match stored {
            Some(hash) => self.verify_secret(secret, hash).await,
            None => {
                debug!(username, "Unknown username");
                Ok(false)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>> {
        let owned = username.to_string();
        let row = self
            .manager
            .read("find_credential", move |session| {
                Box::pin(async move {
                    sqlx::query_as::<_, CredentialRow>(
                        r#"
                        SELECT id, username, password_hash, email
                        FROM credentials
                        WHERE username = ?
                        "#,
                    )
                    .bind(owned)
                    .fetch_optional(session.conn())
                    .await
                    .map_err(map_sqlx_error)
                })
            })
            .await?;

        Ok(row.map(CredentialRow::into_credential))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    username: String,
    password_hash: String,
    email: String,
}

impl CredentialRow {
    fn into_credential(self) -> Credential {
        Credential {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
        }
    }
}
