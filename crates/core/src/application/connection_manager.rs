// Connection Manager
// Owns the single store connection: connect-with-retry, stale detection,
// transactional execution with reconnect-and-replay commit retries.

use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::application::retry::ReconnectPolicy;
use crate::error::{AppError, Result};
use crate::port::{Connector, FatalHandler, StoreSession};

/// Process-wide owner of the store connection
///
/// Repositories never open or close connections themselves. They hand a unit
/// of work to `transaction` or `read`; the manager lends them the live session
/// for exactly that call. The slot mutex makes acquire-through-commit one
/// critical section, so concurrent callers are serialized.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    slot: Mutex<Option<C::Session>>,
    policy: ReconnectPolicy,
    fatal: Arc<dyn FatalHandler>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager. No connection is opened until first use.
    pub fn new(connector: C, policy: ReconnectPolicy, fatal: Arc<dyn FatalHandler>) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
            policy,
            fatal,
        }
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Block until a live connection exists
    ///
    /// Never fails: connection errors are logged and retried after the
    /// policy's backoff delay, indefinitely.
    pub async fn ensure_connected(&self) {
        let mut slot = self.slot.lock().await;
        self.live_session(&mut slot).await;
    }

    /// Deliberately close the connection (e.g. on shutdown)
    pub async fn disconnect(&self) {
        let mut slot = self.slot.lock().await;
        self.discard(&mut slot).await;
    }

    /// Run read-only work on the live session, outside an explicit transaction
    pub async fn read<T, F>(&self, operation: &str, work: F) -> Result<T>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut C::Session) -> BoxFuture<'s, Result<T>> + Send,
    {
        let mut slot = self.slot.lock().await;
        let session = self.live_session(&mut slot).await;

        let result = work(session).await;
        if let Err(e) = &result {
            warn!(operation = %operation, error = %e, "Read failed");
        }
        result
    }

    /// Run `work` inside a transaction and commit it
    ///
    /// - `work` fails: roll back, return its error (no retry).
    /// - commit fails: drop the connection, reconnect, replay `work` on the
    ///   fresh connection and commit again, up to `commit_attempts` in total.
    /// - every commit attempt failed: notify the `FatalHandler` and return
    ///   `AppError::CommitExhausted`.
    pub async fn transaction<T, F>(&self, operation: &str, work: F) -> Result<T>
    where
        T: Send,
        F: for<'s> Fn(&'s mut C::Session) -> BoxFuture<'s, Result<T>> + Send + Sync,
    {
        let mut slot = self.slot.lock().await;
        let max_attempts = self.policy.commit_attempts();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let session = self.live_session(&mut slot).await;

            if let Err(e) = session.begin().await {
                // Connection state unknown; start clean next time
                warn!(operation = %operation, error = %e, "Failed to begin transaction");
                self.discard(&mut slot).await;
                return Err(e);
            }

            let value = match work(&mut *session).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(operation = %operation, error = %e, "Statement failed, rolling back");
                    if let Err(rollback_err) = session.rollback().await {
                        warn!(
                            operation = %operation,
                            error = %rollback_err,
                            "Rollback failed, dropping connection"
                        );
                        self.discard(&mut slot).await;
                    }
                    return Err(e);
                }
            };

            match session.commit().await {
                Ok(()) => {
                    if attempt > 1 {
                        info!(operation = %operation, attempt, "Commit succeeded after reconnect");
                    } else {
                        debug!(operation = %operation, "Transaction committed");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    error!(
                        operation = %operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Commit failed"
                    );

                    if attempt >= max_attempts {
                        let fatal = AppError::CommitExhausted {
                            attempts: attempt,
                            last_error: e.to_string(),
                        };
                        error!(operation = %operation, "Commit retries exhausted, escalating");
                        // A failed COMMIT can leave the transaction open
                        self.discard(&mut slot).await;
                        self.fatal.on_fatal(&fatal);
                        return Err(fatal);
                    }

                    info!(operation = %operation, "Re-establishing connection before retrying commit");
                    self.discard(&mut slot).await;
                }
            }
        }
    }

    /// Return the live session, reconnecting if it is missing or closed
    async fn live_session<'a>(&self, slot: &'a mut Option<C::Session>) -> &'a mut C::Session {
        let session = match slot.take() {
            Some(mut current) => {
                if current.is_closed().await {
                    info!(target_store = %self.connector.describe(), "Connection lost, re-establishing");
                    if let Err(e) = current.close().await {
                        warn!(error = %e, "Failed to close stale connection");
                    }
                    self.connect_with_retry().await
                } else {
                    current
                }
            }
            None => self.connect_with_retry().await,
        };

        slot.insert(session)
    }

    /// Connect, retrying forever with the policy's backoff
    async fn connect_with_retry(&self) -> C::Session {
        let target = self.connector.describe();
        let mut failures: u32 = 0;

        loop {
            match self.connector.connect().await {
                Ok(session) => {
                    info!(target_store = %target, attempts = failures + 1, "Connected to store");
                    return session;
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let delay = self.policy.delay_for(failures);
                    warn!(
                        target_store = %target,
                        attempt = failures,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Store connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Close and forget the current connection (best effort)
    async fn discard(&self, slot: &mut Option<C::Session>) {
        if let Some(session) = slot.take() {
            match session.close().await {
                Ok(()) => debug!("Previous connection closed"),
                Err(e) => warn!(error = %e, "Failed to close previous connection"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::connector::mocks::{MockConnector, MockSession};
    use crate::port::fatal::mocks::RecordingFatalHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn manager(
        connector: MockConnector,
    ) -> (ConnectionManager<MockConnector>, Arc<RecordingFatalHandler>) {
        let fatal = Arc::new(RecordingFatalHandler::new());
        let manager = ConnectionManager::new(connector, ReconnectPolicy::default(), fatal.clone());
        (manager, fatal)
    }

    fn serial_of(session: &mut MockSession) -> BoxFuture<'_, Result<usize>> {
        let serial = session.serial();
        Box::pin(async move { Ok(serial) })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ensure_connected_retries_until_success() {
        for failures in [0u64, 1, 3, 7] {
            let connector = MockConnector::new().failing_connects(failures as usize);
            let (manager, _) = manager(connector.clone());

            let start = tokio::time::Instant::now();
            manager.ensure_connected().await;

            let state = connector.state();
            assert_eq!(state.connect_calls as u64, failures + 1);
            assert_eq!(state.sessions_opened, 1);
            // One 2s backoff sleep per failure
            assert_eq!(start.elapsed().as_secs(), 2 * failures);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exponential_backoff_respects_cap() {
        let connector = MockConnector::new().failing_connects(4);
        let fatal = Arc::new(RecordingFatalHandler::new());
        let policy = ReconnectPolicy::new(Duration::from_secs(1), 2.0, Duration::from_secs(5), 3);
        let manager = ConnectionManager::new(connector.clone(), policy, fatal);

        let start = tokio::time::Instant::now();
        manager.ensure_connected().await;

        // 1 + 2 + 4 + 5 (capped)
        assert_eq!(start.elapsed().as_secs(), 12);
        assert_eq!(connector.state().connect_calls, 5);
    }

    #[tokio::test]
    async fn test_ensure_connected_is_idempotent() {
        let connector = MockConnector::new();
        let (manager, _) = manager(connector.clone());

        manager.ensure_connected().await;
        manager.ensure_connected().await;

        assert_eq!(connector.state().connect_calls, 1);
    }

    #[tokio::test]
    async fn test_stale_connection_is_replaced() {
        let connector = MockConnector::new();
        let (manager, _) = manager(connector.clone());

        let first = manager.read("probe", serial_of).await.unwrap();
        connector.kill_current_session();
        let second = manager.read("probe", serial_of).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        let state = connector.state();
        assert_eq!(state.connect_calls, 2);
        assert_eq!(state.close_calls, 1);
    }

    #[tokio::test]
    async fn test_stale_close_failure_is_not_propagated() {
        let connector = MockConnector::new().failing_close();
        let (manager, _) = manager(connector.clone());

        manager.ensure_connected().await;
        connector.kill_current_session();

        let serial = manager.read("probe", serial_of).await.unwrap();
        assert_eq!(serial, 2);
    }

    #[tokio::test]
    async fn test_commit_success_first_try() {
        let connector = MockConnector::new();
        let (manager, fatal) = manager(connector.clone());

        let value = manager.transaction("insert", serial_of).await.unwrap();

        assert_eq!(value, 1);
        let state = connector.state();
        assert_eq!(state.begin_calls, 1);
        assert_eq!(state.commit_calls, 1);
        assert_eq!(state.rollback_calls, 0);
        assert_eq!(fatal.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_exhaustion_escalates_after_third_failure() {
        let connector = MockConnector::new().failing_commits(3);
        let (manager, fatal) = manager(connector.clone());
        let runs = AtomicUsize::new(0);

        let result = manager
            .transaction("insert", |session| {
                runs.fetch_add(1, Ordering::SeqCst);
                serial_of(session)
            })
            .await;

        match result {
            Err(AppError::CommitExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected CommitExhausted, got {:?}", other),
        }
        assert_eq!(fatal.call_count(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        let state = connector.state();
        assert_eq!(state.commit_calls, 3);
        // Initial connection + one reconnect after each of the first two failures
        assert_eq!(state.connect_calls, 3);
        // Every session that saw a failed commit is closed, the last one included
        assert_eq!(state.close_calls, 3);
    }

    #[tokio::test]
    async fn test_transaction_after_exhaustion_uses_fresh_connection() {
        let connector = MockConnector::new().failing_commits(3);
        let (manager, fatal) = manager(connector.clone());

        let exhausted = manager.transaction("insert", serial_of).await;
        assert!(matches!(exhausted, Err(AppError::CommitExhausted { .. })));
        assert_eq!(fatal.call_count(), 1);

        let serial = manager.transaction("insert", serial_of).await.unwrap();

        assert_eq!(serial, 4);
        let state = connector.state();
        assert_eq!(state.connect_calls, 4);
        assert_eq!(state.commit_calls, 4);
        assert_eq!(fatal.call_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_retry_replays_work_on_fresh_connection() {
        let connector = MockConnector::new().failing_commits(2);
        let (manager, fatal) = manager(connector.clone());
        let serials = std::sync::Mutex::new(Vec::new());

        let value = manager
            .transaction("update", |session| {
                serials.lock().unwrap().push(session.serial());
                serial_of(session)
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(*serials.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(fatal.call_count(), 0);
        assert_eq!(connector.state().commit_calls, 3);
    }

    #[tokio::test]
    async fn test_commit_attempts_follow_policy() {
        let connector = MockConnector::new().failing_commits(10);
        let fatal = Arc::new(RecordingFatalHandler::new());
        let policy = ReconnectPolicy::default().with_commit_attempts(5);
        let manager = ConnectionManager::new(connector.clone(), policy, fatal.clone());

        let result = manager.transaction("insert", serial_of).await;

        assert!(matches!(
            result,
            Err(AppError::CommitExhausted { attempts: 5, .. })
        ));
        assert_eq!(connector.state().commit_calls, 5);
        assert_eq!(fatal.call_count(), 1);
    }

    #[tokio::test]
    async fn test_work_failure_rolls_back_without_retry() {
        let connector = MockConnector::new();
        let (manager, fatal) = manager(connector.clone());
        let runs = AtomicUsize::new(0);

        let result: Result<()> = manager
            .transaction("insert", |_session| {
                runs.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Err(AppError::Constraint("UNIQUE failed".to_string())) })
            })
            .await;

        assert!(matches!(result, Err(AppError::Constraint(_))));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        let state = connector.state();
        assert_eq!(state.rollback_calls, 1);
        assert_eq!(state.commit_calls, 0);
        assert_eq!(fatal.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_are_serialized() {
        let connector = MockConnector::new();
        let (manager, _) = manager(connector.clone());
        let manager = Arc::new(manager);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                manager
                    .transaction("concurrent", |_session| {
                        let in_flight = Arc::clone(&in_flight);
                        let max_seen = Arc::clone(&max_seen);
                        Box::pin(async move {
                            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            tokio::task::yield_now().await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(connector.state().commit_calls, 8);
        assert_eq!(connector.state().connect_calls, 1);
    }

    #[tokio::test]
    async fn test_disconnect_then_reconnect_on_demand() {
        let connector = MockConnector::new();
        let (manager, _) = manager(connector.clone());

        manager.ensure_connected().await;
        manager.disconnect().await;
        let serial = manager.read("probe", serial_of).await.unwrap();

        assert_eq!(serial, 2);
        assert_eq!(connector.state().close_calls, 1);
    }
}
