// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Commit failed after {attempts} attempts: {last_error}")]
    CommitExhausted { attempts: u32, last_error: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure category exposed to calling layers
///
/// Callers outside the store layer only see the kind, never the cause text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    ConstraintViolation,
    Validation,
    NotFound,
    Fatal,
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Connectivity => write!(f, "connectivity"),
            ErrorKind::ConstraintViolation => write!(f, "constraint violation"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Fatal => write!(f, "fatal"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(_) | AppError::Validation(_) | AppError::Serialization(_) => {
                ErrorKind::Validation
            }
            AppError::Connection(_) => ErrorKind::Connectivity,
            AppError::Constraint(_) => ErrorKind::ConstraintViolation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::CommitExhausted { .. } => ErrorKind::Fatal,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// True only for commit-retry exhaustion
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::CommitExhausted { .. })
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate (orphan rules)
