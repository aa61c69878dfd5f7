// Store Connection Port
// Abstraction over "open a connection" and the per-connection transaction verbs

use crate::error::Result;
use async_trait::async_trait;

/// A live connection to the relational store
///
/// Owned exclusively by the `ConnectionManager`; repositories only ever see a
/// `&mut` borrow for the duration of one operation.
#[async_trait]
pub trait StoreSession: Send {
    /// Whether the underlying connection is known to be dead
    async fn is_closed(&mut self) -> bool;

    /// Start an explicit transaction
    async fn begin(&mut self) -> Result<()>;

    /// Commit the current transaction
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction
    async fn rollback(&mut self) -> Result<()>;

    /// Tear the connection down
    async fn close(self) -> Result<()>;
}

/// Factory for store sessions
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: StoreSession + 'static;

    /// Open a new connection (single attempt, no retry)
    async fn connect(&self) -> Result<Self::Session>;

    /// Human-readable target for logs (must not contain credentials)
    fn describe(&self) -> String;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Shared counters and scripted failures for `MockConnector`
    #[derive(Debug, Default, Clone)]
    pub struct MockStoreState {
        pub connect_calls: usize,
        pub connect_failures: usize,
        pub begin_calls: usize,
        pub commit_calls: usize,
        pub commit_failures: usize,
        pub rollback_calls: usize,
        pub close_calls: usize,
        pub fail_close: bool,
        pub sessions_opened: usize,
        pub dead_sessions: Vec<usize>,
    }

    /// Scriptable connector: fails the next N connects / commits on demand
    #[derive(Clone, Default)]
    pub struct MockConnector {
        state: Arc<Mutex<MockStoreState>>,
    }

    impl MockConnector {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail the next `n` connection attempts
        pub fn failing_connects(self, n: usize) -> Self {
            self.state.lock().unwrap().connect_failures = n;
            self
        }

        /// Fail the next `n` commits
        pub fn failing_commits(self, n: usize) -> Self {
            self.state.lock().unwrap().commit_failures = n;
            self
        }

        /// Make `close` on stale sessions return an error
        pub fn failing_close(self) -> Self {
            self.state.lock().unwrap().fail_close = true;
            self
        }

        /// Simulate the server dropping the most recently opened connection
        pub fn kill_current_session(&self) {
            let mut state = self.state.lock().unwrap();
            let serial = state.sessions_opened;
            state.dead_sessions.push(serial);
        }

        pub fn state(&self) -> MockStoreState {
            self.state.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        type Session = MockSession;

        async fn connect(&self) -> Result<MockSession> {
            let mut state = self.state.lock().unwrap();
            state.connect_calls += 1;
            if state.connect_failures > 0 {
                state.connect_failures -= 1;
                return Err(AppError::Connection("connection refused".to_string()));
            }
            state.sessions_opened += 1;
            Ok(MockSession {
                serial: state.sessions_opened,
                state: Arc::clone(&self.state),
            })
        }

        fn describe(&self) -> String {
            "mock://store".to_string()
        }
    }

    /// Session handed out by `MockConnector`
    pub struct MockSession {
        serial: usize,
        state: Arc<Mutex<MockStoreState>>,
    }

    impl MockSession {
        /// 1-based ordinal of the connection this session belongs to
        pub fn serial(&self) -> usize {
            self.serial
        }
    }

    #[async_trait]
    impl StoreSession for MockSession {
        async fn is_closed(&mut self) -> bool {
            self.state.lock().unwrap().dead_sessions.contains(&self.serial)
        }

        async fn begin(&mut self) -> Result<()> {
            self.state.lock().unwrap().begin_calls += 1;
            Ok(())
        }

        async fn commit(&mut self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.commit_calls += 1;
            if state.commit_failures > 0 {
                state.commit_failures -= 1;
                return Err(AppError::Database("commit failed: disk I/O error".to_string()));
            }
            Ok(())
        }

        async fn rollback(&mut self) -> Result<()> {
            self.state.lock().unwrap().rollback_calls += 1;
            Ok(())
        }

        async fn close(self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.close_calls += 1;
            if state.fail_close {
                return Err(AppError::Connection("socket already closed".to_string()));
            }
            Ok(())
        }
    }
}
