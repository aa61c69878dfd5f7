// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Field must not be blank: {0}")]
    BlankField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid table number: {0} (must be positive)")]
    InvalidTableNumber(i32),
}

pub type Result<T> = std::result::Result<T, DomainError>;
