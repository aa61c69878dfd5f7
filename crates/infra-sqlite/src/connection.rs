// SQLite Connector & Session

use async_trait::async_trait;
use orderdesk_core::application::ConnectionManager;
use orderdesk_core::error::Result;
use orderdesk_core::port::{Connector, StoreSession};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use std::time::Duration;

use crate::error::map_sqlx_error;

/// Connection manager bound to the SQLite adapter
pub type SqliteConnectionManager = ConnectionManager<SqliteConnector>;

/// Opens single SQLite connections with WAL mode and optimizations
pub struct SqliteConnector {
    options: SqliteConnectOptions,
    url: String,
}

impl SqliteConnector {
    pub fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        Ok(Self {
            options,
            url: database_url.to_string(),
        })
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Session = SqliteSession;

    async fn connect(&self) -> Result<SqliteSession> {
        let mut conn = self.options.connect().await.map_err(map_sqlx_error)?;

        // Enable foreign keys
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(SqliteSession { conn })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// One live SQLite connection
pub struct SqliteSession {
    conn: SqliteConnection,
}

impl SqliteSession {
    /// Executor for statements inside the current unit of work
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

#[async_trait]
impl StoreSession for SqliteSession {
    async fn is_closed(&mut self) -> bool {
        self.conn.ping().await.is_err()
    }

    async fn begin(&mut self) -> Result<()> {
        // IMMEDIATE takes the write lock up front (avoids upgrade deadlocks)
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut self.conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        sqlx::query("COMMIT")
            .execute(&mut self.conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        sqlx::query("ROLLBACK")
            .execute(&mut self.conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(map_sqlx_error)
    }
}
