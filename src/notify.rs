//! Toast notification channel
//!
//! Fire-and-forget feedback messages. Each notification is timed on its own
//! and drops out of the visible set once its lifetime has passed. There is no
//! cap on how many are visible at once and no deduplication.

use std::time::Duration;

use jiff::Timestamp;
use tokio::time::Instant;

/// Default time a notification stays visible
pub const DEFAULT_TOAST_LIFETIME: Duration = Duration::from_millis(3000);

/// Severity level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A transient feedback message
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            created_at: Timestamp::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

#[derive(Debug, Clone)]
struct Posted {
    notification: Notification,
    expires_at: Instant,
}

/// Holds every notification that is still on screen.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    lifetime: Duration,
    posted: Vec<Posted>,
    total_posted: u64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIFETIME)
    }
}

impl NotificationCenter {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            posted: Vec::new(),
            total_posted: 0,
        }
    }

    /// Show a notification. Never blocks and never fails.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.post(Notification::new(message, severity));
    }

    pub fn post(&mut self, notification: Notification) {
        tracing::debug!("notify[{}]: {}", notification.severity, notification.message);
        self.posted.push(Posted {
            notification,
            expires_at: Instant::now() + self.lifetime,
        });
        self.total_posted += 1;
    }

    /// Notifications still within their lifetime, oldest first
    pub fn visible(&mut self) -> Vec<Notification> {
        self.prune();
        self.posted.iter().map(|p| p.notification.clone()).collect()
    }

    /// Most recent notification that is still visible
    pub fn latest(&mut self) -> Option<Notification> {
        self.prune();
        self.posted.last().map(|p| p.notification.clone())
    }

    /// Number of notifications ever posted, expired ones included
    pub fn total_posted(&self) -> u64 {
        self.total_posted
    }

    fn prune(&mut self) {
        let now = Instant::now();
        self.posted.retain(|p| p.expires_at > now);
    }
}
