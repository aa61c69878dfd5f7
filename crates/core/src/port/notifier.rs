// Change Notification Port
// Lets an external synchronization layer react to successful writes

use crate::domain::{CredentialId, OrderId, OrderStatus};

/// A committed change worth broadcasting to other clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    CredentialCreated(CredentialId),
    OrderCreated(OrderId),
    OrderStatusChanged { id: OrderId, status: OrderStatus },
}

/// Receives changes after the owning transaction committed
pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, change: Change);
}

/// Discards every change
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify(&self, _change: Change) {}
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        changes: Mutex<Vec<Change>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn changes(&self) -> Vec<Change> {
            self.changes.lock().unwrap().clone()
        }
    }

    impl ChangeNotifier for RecordingNotifier {
        fn notify(&self, change: Change) {
            self.changes.lock().unwrap().push(change);
        }
    }
}
