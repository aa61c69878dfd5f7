// Port Layer - Interfaces for external dependencies

pub mod connector;
pub mod credential_repository;
pub mod fatal;
pub mod notifier;
pub mod order_repository;
pub mod password_hasher;

// Re-exports
pub use connector::{Connector, StoreSession};
pub use credential_repository::CredentialRepository;
pub use fatal::{FatalHandler, LogFatalHandler};
pub use notifier::{Change, ChangeNotifier, NoopNotifier};
pub use order_repository::OrderRepository;
pub use password_hasher::PasswordHasher;
