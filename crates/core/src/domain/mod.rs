// Domain Layer - Pure business logic and entities

pub mod credential;
pub mod error;
pub mod order;

// Re-exports
pub use credential::{Credential, CredentialId, NewCredential};
pub use error::DomainError;
pub use order::{NewOrder, Order, OrderId, OrderStatus, ORDER_COLUMNS};
