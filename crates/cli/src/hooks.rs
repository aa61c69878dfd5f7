// Process-level implementations of the core hooks

use orderdesk_core::error::AppError;
use orderdesk_core::port::{Change, ChangeNotifier, FatalHandler};
use tracing::{error, info};

/// Terminates the process with status 1 once commits are exhausted
pub struct ExitProcessHandler;

impl FatalHandler for ExitProcessHandler {
    fn on_fatal(&self, error: &AppError) {
        error!(error = %error, "Store refuses commits, exiting");
        std::process::exit(1);
    }
}

/// Records committed changes in the log; the CLI has no peers to notify
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn notify(&self, change: Change) {
        info!(change = ?change, "Change committed");
    }
}
