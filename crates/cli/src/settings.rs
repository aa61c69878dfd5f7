// Configuration loading: optional TOML file layered under ORDERDESK_* env vars

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use orderdesk_core::config::StoreConfig;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "orderdesk.toml";
const ENV_PREFIX: &str = "ORDERDESK";

/// Load the store configuration
///
/// A missing file is not an error; defaults apply for every absent key.
pub fn load(path: &Path) -> Result<StoreConfig> {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);

    let raw = Config::builder()
        .add_source(File::new(&expanded, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    let mut store: StoreConfig = raw
        .try_deserialize()
        .context("Invalid store configuration")?;
    store.database_url = expand_database_url(&store.database_url);
    Ok(store)
}

/// Expand a leading `~` in the path part of a file-backed SQLite URL
pub fn expand_database_url(url: &str) -> String {
    match url.strip_prefix("sqlite://") {
        Some(path) if path.starts_with('~') => {
            format!("sqlite://{}", shellexpand::tilde(path))
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_database_url() {
        let expanded = expand_database_url("sqlite://~/orderdesk.db");
        assert!(expanded.starts_with("sqlite://"));
        assert!(!expanded.contains('~'));
        assert!(expanded.ends_with("/orderdesk.db"));

        assert_eq!(
            expand_database_url("sqlite::memory:"),
            "sqlite::memory:".to_string()
        );
        assert_eq!(
            expand_database_url("sqlite://data/orders.db"),
            "sqlite://data/orders.db".to_string()
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let store = load(Path::new("/nonexistent/orderdesk.toml")).unwrap();

        assert_eq!(store.connection.commit_attempts, 3);
        assert_eq!(store.connection.reconnect_interval_ms, 2000);
    }
}
