//! OS-level notification side channel.
//!
//! The center mirrors local adds through a `DesktopNotifier` when the
//! platform reports permission. Failures never propagate past the center.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Icon used when a notification does not carry its own.
pub const DEFAULT_ICON: &str = "/favicon.ico";

/// Platform permission state for desktop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Default,
    Unsupported,
}

impl NotificationPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Default => "default",
            Self::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    PermissionDenied,
    Unavailable(String),
}

impl Display for NotifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "desktop notification permission denied"),
            Self::Unavailable(reason) => write!(f, "desktop notifications unavailable: {reason}"),
        }
    }
}

impl Error for NotifierError {}

pub trait DesktopNotifier {
    fn permission(&self) -> NotificationPermission;
    fn notify(&self, title: &str, body: &str, icon: &str) -> Result<(), NotifierError>;
}

/// Notifier for hosts without a notification surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl DesktopNotifier for NoopNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Unsupported
    }

    fn notify(&self, _title: &str, _body: &str, _icon: &str) -> Result<(), NotifierError> {
        Err(NotifierError::Unavailable("no notification surface".to_string()))
    }
}
