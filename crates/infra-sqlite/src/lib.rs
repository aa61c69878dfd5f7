// OrderDesk Infrastructure - SQLite Adapter
// Implements: Connector/StoreSession, CredentialRepository, OrderRepository

mod connection;
mod credential_repository;
mod error;
mod migration;
mod order_repository;

pub use connection::{SqliteConnectionManager, SqliteConnector, SqliteSession};
pub use credential_repository::SqliteCredentialRepository;
pub use error::map_sqlx_error;
pub use migration::{apply_schema, CREDENTIAL_SCHEMA, ORDER_SCHEMA};
pub use order_repository::SqliteOrderRepository;

// Note: sqlx::Error conversion is handled by map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
