// Fatal escalation port
// Invoked when the store refuses commits even after fresh reconnects

use crate::error::AppError;

/// Policy hook for unrecoverable store conditions
///
/// The embedding application decides what "fatal" means: exit, alert, restart.
pub trait FatalHandler: Send + Sync {
    fn on_fatal(&self, error: &AppError);
}

/// Logs the condition and lets the error propagate to the caller
pub struct LogFatalHandler;

impl FatalHandler for LogFatalHandler {
    fn on_fatal(&self, error: &AppError) {
        tracing::error!(error = %error, "Unrecoverable store failure");
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records every fatal error it receives
    #[derive(Default)]
    pub struct RecordingFatalHandler {
        errors: Mutex<Vec<String>>,
    }

    impl RecordingFatalHandler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn call_count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }

        pub fn messages(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }
    }

    impl FatalHandler for RecordingFatalHandler {
        fn on_fatal(&self, error: &AppError) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }
}
