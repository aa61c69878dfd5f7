// sqlx::Error -> AppError mapping

use orderdesk_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite extended result codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE / PRIMARY KEY constraint failed
                        AppError::Constraint(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "787" | "3850" => AppError::Constraint(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "1299" => AppError::Constraint(format!(
                        "NOT NULL constraint violation: {}",
                        db_err.message()
                    )),
                    "275" => AppError::Constraint(format!(
                        "CHECK constraint violation: {}",
                        db_err.message()
                    )),
                    "5" | "6" => {
                        // SQLITE_BUSY / SQLITE_LOCKED
                        AppError::Database(format!("Database locked: {}", db_err.message()))
                    }
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        sqlx::Error::Configuration(_) => AppError::Config(err.to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => AppError::Connection(err.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::ErrorKind;

    #[test]
    fn test_transport_errors_are_connectivity() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert_eq!(map_sqlx_error(io).kind(), ErrorKind::Connectivity);
        assert_eq!(
            map_sqlx_error(sqlx::Error::PoolTimedOut).kind(),
            ErrorKind::Connectivity
        );
    }

    #[test]
    fn test_row_not_found() {
        assert_eq!(
            map_sqlx_error(sqlx::Error::RowNotFound).kind(),
            ErrorKind::NotFound
        );
    }
}
