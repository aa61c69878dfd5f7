// Credential Domain Model (employee login records)

use serde::Deserialize;

use crate::domain::error::{DomainError, Result};

/// Store-assigned credential identifier
pub type CredentialId = i64;

/// Persisted credential. `password_hash` is a PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: CredentialId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Registration payload
///
/// Carries the plaintext secret only until it is hashed by the repository.
#[derive(Clone, Deserialize)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewCredential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }

    /// Parse a JSON object (`{"username", "password", "email"}`) and validate it
    pub fn from_json(raw: &str) -> crate::error::Result<Self> {
        let record: NewCredential = serde_json::from_str(raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::BlankField("username"));
        }
        if self.password.is_empty() {
            return Err(DomainError::BlankField("password"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DomainError::BlankField("email"));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(DomainError::InvalidEmail(self.email.clone())),
        }
    }
}

// Secret stays out of logs
impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_record() {
        let record = NewCredential::new("alice", "s3cret", "alice@example.com");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let record = NewCredential::new("  ", "s3cret", "alice@example.com");
        assert_eq!(
            record.validate(),
            Err(DomainError::BlankField("username"))
        );

        let record = NewCredential::new("alice", "", "alice@example.com");
        assert_eq!(
            record.validate(),
            Err(DomainError::BlankField("password"))
        );
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        for email in ["alice", "@example.com", "alice@"] {
            let record = NewCredential::new("alice", "s3cret", email);
            assert!(matches!(
                record.validate(),
                Err(DomainError::InvalidEmail(_))
            ));
        }
    }

    #[test]
    fn test_from_json() {
        let record = NewCredential::from_json(
            r#"{"username": "bob", "password": "hunter2", "email": "bob@diner.io"}"#,
        )
        .unwrap();
        assert_eq!(record.username, "bob");

        assert!(NewCredential::from_json(r#"{"username": "bob"}"#).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let record = NewCredential::new("alice", "s3cret", "alice@example.com");
        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
