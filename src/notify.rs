/// User-facing notifications emitted at the orchestrator boundary
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A transient banner shown to the user
///
/// Error-class notifications persist longer than info/success ones.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// How long the banner stays on screen
    pub fn display_duration(&self) -> Duration {
        match self.kind {
            NotificationKind::Error => Duration::from_secs(8),
            _ => Duration::from_secs(5),
        }
    }
}
