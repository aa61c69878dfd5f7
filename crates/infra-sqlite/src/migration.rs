// Schema Runner

use orderdesk_core::error::Result;
use tracing::debug;

use crate::connection::SqliteSession;
use crate::error::map_sqlx_error;

/// Credentials table (create-if-absent)
pub const CREDENTIAL_SCHEMA: &str = include_str!("../migrations/001_credentials.sql");

/// Orders table (create-if-absent)
pub const ORDER_SCHEMA: &str = include_str!("../migrations/002_orders.sql");

/// Apply a schema script on the given session
///
/// Runs inside the caller's transaction. Statements are split on `;` and
/// comment lines are dropped.
pub async fn apply_schema(session: &mut SqliteSession, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        let clean_statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if !clean_statement.is_empty() {
            debug!(statement = %clean_statement, "Applying schema statement");
            sqlx::query(&clean_statement)
                .execute(session.conn())
                .await
                .map_err(map_sqlx_error)?;
        }
    }

    Ok(())
}
