// Front Desk - operation surface for the GUI and sync layers
use std::sync::Arc;
use tracing::{error, warn};

use crate::domain::{CredentialId, NewCredential, NewOrder, Order, OrderId, OrderStatus};
use crate::error::{ErrorKind, Result};
use crate::port::{Change, ChangeNotifier, CredentialRepository, OrderRepository};

/// Success value, or the kind of failure without its cause
pub type Outcome<T> = std::result::Result<T, ErrorKind>;

/// Facade over the repositories for presentation-layer callers
///
/// Causes are logged here and reduced to an `ErrorKind`. Successful writes are
/// forwarded to the `ChangeNotifier` after commit.
pub struct FrontDesk {
    credentials: Arc<dyn CredentialRepository>,
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl FrontDesk {
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            credentials,
            orders,
            notifier,
        }
    }

    pub async fn insert_credential(&self, record: &NewCredential) -> Outcome<CredentialId> {
        let id = settle("insert_credential", self.credentials.insert(record).await)?;
        self.notifier.notify(Change::CredentialCreated(id));
        Ok(id)
    }

    /// Accepts `{"username", "password", "email"}`
    pub async fn insert_credential_json(&self, raw: &str) -> Outcome<CredentialId> {
        let record = settle("insert_credential", NewCredential::from_json(raw))?;
        self.insert_credential(&record).await
    }

    pub async fn authenticate(&self, username: &str, secret: &str) -> Outcome<bool> {
        settle(
            "authenticate",
            self.credentials.authenticate(username, secret).await,
        )
    }

    pub async fn insert_order(&self, order: &NewOrder) -> Outcome<OrderId> {
        let id = settle("insert_order", self.orders.insert(order).await)?;
        self.notifier.notify(Change::OrderCreated(id));
        Ok(id)
    }

    /// Accepts `{"table_number", "status", "timestamp"}`
    pub async fn insert_order_json(&self, raw: &str) -> Outcome<OrderId> {
        let order = settle("insert_order", NewOrder::from_json(raw))?;
        self.insert_order(&order).await
    }

    pub async fn update_order_status(&self, id: OrderId, status: &OrderStatus) -> Outcome<()> {
        settle(
            "update_order_status",
            self.orders.update_status(id, status).await,
        )?;
        self.notifier.notify(Change::OrderStatusChanged {
            id,
            status: status.clone(),
        });
        Ok(())
    }

    pub async fn find_order(&self, id: OrderId) -> Outcome<Option<Order>> {
        settle("find_order", self.orders.find_by_id(id).await)
    }

    pub async fn fetch_recent_orders(&self, limit: u32) -> Outcome<Vec<Order>> {
        settle("fetch_recent_orders", self.orders.fetch_recent(limit).await)
    }

    pub async fn fetch_all_orders(&self) -> Outcome<Vec<Order>> {
        settle("fetch_all_orders", self.orders.fetch_all().await)
    }

    pub async fn export_orders_csv(&self) -> Outcome<String> {
        settle("export_orders_csv", self.orders.export_csv().await)
    }
}

fn settle<T>(operation: &'static str, result: Result<T>) -> Outcome<T> {
    result.map_err(|e| {
        if e.is_fatal() {
            error!(operation, error = %e, "Operation hit an unrecoverable store failure");
        } else {
            warn!(operation, kind = %e.kind(), error = %e, "Operation failed");
        }
        e.kind()
    })
}
