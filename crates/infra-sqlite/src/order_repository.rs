// SQLite OrderRepository Implementation

use async_trait::async_trait;
use chrono::NaiveDateTime;
use orderdesk_core::application::orders_to_csv;
use orderdesk_core::domain::{NewOrder, Order, OrderId, OrderStatus};
use orderdesk_core::error::{AppError, Result};
use orderdesk_core::port::OrderRepository;
use std::sync::Arc;
use tracing::{info, warn};

use crate::connection::SqliteConnectionManager;
use crate::error::map_sqlx_error;
use crate::migration::{apply_schema, ORDER_SCHEMA};

pub struct SqliteOrderRepository {
    manager: Arc<SqliteConnectionManager>,
}

impl SqliteOrderRepository {
    pub fn new(manager: Arc<SqliteConnectionManager>) -> Self {
        Self { manager }
    }

    /// Create the repository and ensure its table exists
    ///
    /// A schema failure is logged, not returned: the table may already exist
    /// with a compatible shape.
    pub async fn bootstrap(manager: Arc<SqliteConnectionManager>) -> Self {
        let repo = Self::new(manager);
        if let Err(e) = repo.initialize_schema().await {
            warn!(error = %e, "Could not initialize order table");
        }
        repo
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn initialize_schema(&self) -> Result<()> {
        self.manager
            .transaction("initialize_order_schema", |session| {
                Box::pin(apply_schema(session, ORDER_SCHEMA))
            })
            .await?;
        info!("Order table initialized");
        Ok(())
    }

    async fn insert(&self, order: &NewOrder) -> Result<OrderId> {
        order.validate()?;

        let id = self
            .manager
            .transaction("insert_order", |session| {
                let table_number = order.table_number;
                let status = order.status.as_str().to_string();
                let timestamp = order.timestamp;
                Box::pin(async move {
                    let result = sqlx::query(
                        "INSERT INTO orders (table_number, status, timestamp) VALUES (?, ?, ?)",
                    )
                    .bind(table_number)
                    .bind(status)
                    .bind(timestamp)
                    .execute(session.conn())
                    .await
                    .map_err(map_sqlx_error)?;
                    Ok(result.last_insert_rowid())
                })
            })
            .await?;

        info!(order_id = id, table_number = order.table_number, "Order created");
        Ok(id)
    }

    async fn update_status(&self, id: OrderId, status: &OrderStatus) -> Result<()> {
        status.validate()?;

        self.manager
            .transaction("update_order_status", |session| {
                let status = status.as_str().to_string();
                Box::pin(async move {
                    let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
                        .bind(status)
                        .bind(id)
                        .execute(session.conn())
                        .await
                        .map_err(map_sqlx_error)?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::NotFound(format!("Order {} not found", id)));
                    }
                    Ok(())
                })
            })
            .await?;

        info!(order_id = id, status = %status, "Order status updated");
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = self
            .manager
            .read("find_order", move |session| {
                Box::pin(async move {
                    sqlx::query_as::<_, OrderRow>(
                        "SELECT id, table_number, status, timestamp FROM orders WHERE id = ?",
                    )
                    .bind(id)
                    .fetch_optional(session.conn())
                    .await
                    .map_err(map_sqlx_error)
                })
            })
            .await?;

        Ok(row.map(OrderRow::into_order))
    }

    async fn fetch_recent(&self, limit: u32) -> Result<Vec<Order>> {
        let rows = self
            .manager
            .read("fetch_recent_orders", move |session| {
                Box::pin(async move {
                    sqlx::query_as::<_, OrderRow>(
                        r#"
                        SELECT id, table_number, status, timestamp FROM orders
                        ORDER BY id DESC
                        LIMIT ?
                        "#,
                    )
                    .bind(i64::from(limit))
                    .fetch_all(session.conn())
                    .await
                    .map_err(map_sqlx_error)
                })
            })
            .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    async fn fetch_all(&self) -> Result<Vec<Order>> {
        let rows = self
            .manager
            .read("fetch_all_orders", |session| {
                Box::pin(async move {
                    sqlx::query_as::<_, OrderRow>(
                        "SELECT id, table_number, status, timestamp FROM orders ORDER BY id ASC",
                    )
                    .fetch_all(session.conn())
                    .await
                    .map_err(map_sqlx_error)
                })
            })
            .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    async fn export_csv(&self) -> Result<String> {
        let orders = self.fetch_all().await?;
        Ok(orders_to_csv(&orders))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    table_number: i32,
    status: String,
    timestamp: NaiveDateTime,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: self.id,
            table_number: self.table_number,
            status: OrderStatus::new(self.status),
            timestamp: self.timestamp,
        }
    }
}
