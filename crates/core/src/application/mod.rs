// Application Layer - Use Cases and Store Plumbing

pub mod connection_manager;
pub mod constants;
pub mod export;
pub mod front_desk;
pub mod retry;

// Re-exports
pub use connection_manager::ConnectionManager;
pub use export::orders_to_csv;
pub use front_desk::{FrontDesk, Outcome};
pub use retry::ReconnectPolicy;
