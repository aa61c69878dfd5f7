// Order Repository Port (Interface)

use crate::domain::{NewOrder, Order, OrderId, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for order persistence
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Create the backing table if it does not exist
    async fn initialize_schema(&self) -> Result<()>;

    /// Insert a new order, returning its store-assigned id
    async fn insert(&self, order: &NewOrder) -> Result<OrderId>;

    /// Set the status of an existing order
    ///
    /// Returns `AppError::NotFound` when no row has the given id.
    async fn update_status(&self, id: OrderId, status: &OrderStatus) -> Result<()>;

    /// Find order by ID
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Up to `limit` most recent orders, newest (highest id) first
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<Order>>;

    /// Every order, oldest first
    async fn fetch_all(&self) -> Result<Vec<Order>>;

    /// All orders rendered as CSV text (header line included)
    async fn export_csv(&self) -> Result<String>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::application::export::orders_to_csv;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory order store with a switch to simulate an unreachable store
    #[derive(Default)]
    pub struct InMemoryOrderRepository {
        rows: Mutex<Vec<Order>>,
        offline: AtomicBool,
    }

    impl InMemoryOrderRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every subsequent call fails with a connection error while set
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn check_online(&self) -> Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(AppError::Connection("store unreachable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl OrderRepository for InMemoryOrderRepository {
        async fn initialize_schema(&self) -> Result<()> {
            self.check_online()
        }

        async fn insert(&self, order: &NewOrder) -> Result<OrderId> {
            self.check_online()?;
            order.validate()?;
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as OrderId + 1;
            rows.push(Order {
                id,
                table_number: order.table_number,
                status: order.status.clone(),
                timestamp: order.timestamp,
            });
            Ok(id)
        }

        async fn update_status(&self, id: OrderId, status: &OrderStatus) -> Result<()> {
            self.check_online()?;
            status.validate()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|o| o.id == id) {
                Some(order) => {
                    order.status = status.clone();
                    Ok(())
                }
                None => Err(AppError::NotFound(format!("Order {} not found", id))),
            }
        }

        async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
            self.check_online()?;
            Ok(self.rows.lock().unwrap().iter().find(|o| o.id == id).cloned())
        }

        async fn fetch_recent(&self, limit: u32) -> Result<Vec<Order>> {
            self.check_online()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().rev().take(limit as usize).cloned().collect())
        }

        async fn fetch_all(&self) -> Result<Vec<Order>> {
            self.check_online()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn export_csv(&self) -> Result<String> {
            let rows = self.fetch_all().await?;
            Ok(orders_to_csv(&rows))
        }
    }
}
