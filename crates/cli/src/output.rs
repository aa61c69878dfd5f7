// Terminal rendering

use colored::{ColoredString, Colorize};
use orderdesk_core::domain::{Order, OrderStatus};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OrderView {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Table")]
    table: i32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Placed At")]
    timestamp: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            table: order.table_number,
            status: order.status.to_string(),
            timestamp: order.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub fn order_table(orders: &[Order]) -> String {
    Table::new(orders.iter().map(OrderView::from)).to_string()
}

pub fn status_badge(status: &OrderStatus) -> ColoredString {
    match status.as_str() {
        OrderStatus::FINISHED => status.as_str().green().bold(),
        OrderStatus::CANCELLED => status.as_str().red().bold(),
        OrderStatus::IN_PROGRESS => status.as_str().yellow().bold(),
        other => other.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_order_table_lists_every_order() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(18, 5, 0)
            .unwrap();
        let orders = vec![Order {
            id: 7,
            table_number: 4,
            status: OrderStatus::in_progress(),
            timestamp: at,
        }];

        let table = order_table(&orders);
        assert!(table.contains("Placed At"));
        assert!(table.contains("in progress"));
        assert!(table.contains("2024-03-01 18:05:00"));
    }
}
