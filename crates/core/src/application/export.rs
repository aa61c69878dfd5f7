// CSV export of orders
use std::borrow::Cow;

use crate::domain::{Order, ORDER_COLUMNS};

/// Render orders as CSV: header line, then one `\n`-terminated line per row
///
/// Fields containing a comma, quote or line break are quoted, with embedded
/// quotes doubled. Everything else is written verbatim.
pub fn orders_to_csv(orders: &[Order]) -> String {
    let mut out = ORDER_COLUMNS.join(",");
    out.push('\n');

    for order in orders {
        let fields = [
            order.id.to_string(),
            order.table_number.to_string(),
            order.status.as_str().to_string(),
            order.timestamp.to_string(),
        ];
        let line: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
