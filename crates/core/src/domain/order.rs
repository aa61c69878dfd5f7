// Order Domain Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::{DomainError, Result};

/// Store-assigned order identifier
pub type OrderId = i64;

/// Column order of the `orders` table, as declared in the schema
pub const ORDER_COLUMNS: [&str; 4] = ["id", "table_number", "status", "timestamp"];

/// Accepted textual timestamp layouts (ISO `T` separator or a space)
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Order status label
///
/// Stored as free text; the business process uses a small open set of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub const IN_PROGRESS: &'static str = "in progress";
    pub const CANCELLED: &'static str = "cancelled";
    pub const FINISHED: &'static str = "finished";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn in_progress() -> Self {
        Self::new(Self::IN_PROGRESS)
    }

    pub fn cancelled() -> Self {
        Self::new(Self::CANCELLED)
    }

    pub fn finished() -> Self {
        Self::new(Self::FINISHED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(DomainError::BlankField("status"));
        }
        Ok(())
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub table_number: i32,
    pub status: OrderStatus,
    pub timestamp: NaiveDateTime,
}

/// Order creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub table_number: i32,
    pub status: OrderStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

impl NewOrder {
    pub fn new(table_number: i32, status: OrderStatus, timestamp: NaiveDateTime) -> Self {
        Self {
            table_number,
            status,
            timestamp,
        }
    }

    /// Parse a JSON object (`{"table_number", "status", "timestamp"}`) and validate it
    pub fn from_json(raw: &str) -> crate::error::Result<Self> {
        let order: NewOrder = serde_json::from_str(raw)?;
        order.validate()?;
        Ok(order)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_number <= 0 {
            return Err(DomainError::InvalidTableNumber(self.table_number));
        }
        self.status.validate()
    }
}

/// Parse a timestamp in either accepted layout
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}
