// Store layer constants (no magic values)
use std::time::Duration;

/// Delay between connection attempts (2s, fixed unless a backoff factor is set)
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound for the reconnect delay when exponential backoff is enabled
pub const DEFAULT_MAX_RECONNECT_INTERVAL: Duration = Duration::from_secs(30);

/// Total commit attempts (each retry preceded by a fresh connection)
pub const DEFAULT_COMMIT_ATTEMPTS: u32 = 3;

/// Row cap for the "recent orders" listing
pub const DEFAULT_RECENT_ORDER_LIMIT: u32 = 1000;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://orderdesk.db";
