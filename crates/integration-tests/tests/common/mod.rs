//! Shared wiring for the store integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, NaiveDateTime};
use orderdesk_core::application::{ConnectionManager, ReconnectPolicy};
use orderdesk_core::port::LogFatalHandler;
use orderdesk_infra_crypto::Argon2PasswordHasher;
use orderdesk_infra_sqlite::{
    SqliteConnectionManager, SqliteConnector, SqliteCredentialRepository, SqliteOrderRepository,
};

pub fn manager(database_url: &str) -> Arc<SqliteConnectionManager> {
    let connector = SqliteConnector::new(database_url).unwrap();
    Arc::new(ConnectionManager::new(
        connector,
        ReconnectPolicy::default(),
        Arc::new(LogFatalHandler),
    ))
}

/// Argon2id with fast, insecure parameters
pub fn hasher() -> Arc<Argon2PasswordHasher> {
    Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).unwrap())
}

pub async fn credential_repo(manager: Arc<SqliteConnectionManager>) -> SqliteCredentialRepository {
    SqliteCredentialRepository::bootstrap(manager, hasher()).await
}

pub async fn order_repo(manager: Arc<SqliteConnectionManager>) -> SqliteOrderRepository {
    SqliteOrderRepository::bootstrap(manager).await
}

pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

/// Uniquely named file database, removed with its WAL sidecars on drop
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let name = format!("orderdesk_{}_{}_{}.db", tag, std::process::id(), nanos);
        Self {
            path: std::env::temp_dir().join(name),
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    pub fn sidecars(&self) -> Vec<PathBuf> {
        ["", "-wal", "-shm"]
            .iter()
            .map(|suffix| PathBuf::from(format!("{}{}", self.path.display(), suffix)))
            .collect()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for file in self.sidecars() {
            let _ = std::fs::remove_file(file);
        }
    }
}
