//! Notification sink for development and headless deployments. Logs
//! notifications to tracing output instead of showing a toast.

use corrdesk_application::{NotificationSink, Severity};
use tracing::{error, info, warn};

/// Notification sink that writes messages to the log.
#[derive(Clone)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    /// Creates a new tracing notification sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64) {
        match severity {
            Severity::Error => error!(duration_ms, "{message}"),
            Severity::Warning => warn!(duration_ms, "{message}"),
            Severity::Success | Severity::Info => info!(duration_ms, "{message}"),
        }
    }
}
