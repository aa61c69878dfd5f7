// Store configuration (deserialized by the composition root)

use serde::Deserialize;
use std::time::Duration;

use crate::application::constants::{
    DEFAULT_COMMIT_ATTEMPTS, DEFAULT_DATABASE_URL, DEFAULT_MAX_RECONNECT_INTERVAL,
    DEFAULT_RECONNECT_INTERVAL,
};
use crate::application::retry::ReconnectPolicy;
use crate::error::{AppError, Result};

/// Top-level store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// sqlx database URL (e.g. `sqlite://orderdesk.db`, `sqlite::memory:`)
    pub database_url: String,
    pub connection: ConnectionSettings,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            connection: ConnectionSettings::default(),
        }
    }
}

/// Reconnect and commit-retry tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub reconnect_interval_ms: u64,
    pub backoff_factor: f64,
    pub max_reconnect_interval_ms: u64,
    pub commit_attempts: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL.as_millis() as u64,
            backoff_factor: 1.0,
            max_reconnect_interval_ms: DEFAULT_MAX_RECONNECT_INTERVAL.as_millis() as u64,
            commit_attempts: DEFAULT_COMMIT_ATTEMPTS,
        }
    }
}

impl ConnectionSettings {
    /// Build a validated policy
    pub fn policy(&self) -> Result<ReconnectPolicy> {
        if self.commit_attempts == 0 {
            return Err(AppError::Config(
                "connection.commit_attempts must be at least 1".to_string(),
            ));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(AppError::Config(format!(
                "connection.backoff_factor must be >= 1.0 (got {})",
                self.backoff_factor
            )));
        }
        if self.max_reconnect_interval_ms < self.reconnect_interval_ms {
            return Err(AppError::Config(
                "connection.max_reconnect_interval_ms must be >= reconnect_interval_ms"
                    .to_string(),
            ));
        }

        Ok(ReconnectPolicy::new(
            Duration::from_millis(self.reconnect_interval_ms),
            self.backoff_factor,
            Duration::from_millis(self.max_reconnect_interval_ms),
            self.commit_attempts,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_two_second_retry() {
        let policy = StoreConfig::default().connection.policy().unwrap();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(10), Duration::from_secs(2));
        assert_eq!(policy.commit_attempts(), 3);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = ConnectionSettings {
            commit_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(settings.policy(), Err(AppError::Config(_))));

        let settings = ConnectionSettings {
            backoff_factor: 0.5,
            ..Default::default()
        };
        assert!(settings.policy().is_err());

        let settings = ConnectionSettings {
            reconnect_interval_ms: 5_000,
            max_reconnect_interval_ms: 1_000,
            ..Default::default()
        };
        assert!(settings.policy().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"connection": {"commit_attempts": 5}}"#).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.connection.commit_attempts, 5);
        assert_eq!(config.connection.reconnect_interval_ms, 2_000);
    }
}
