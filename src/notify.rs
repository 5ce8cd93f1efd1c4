//! User-visible notifications (toasts).

use std::fmt;

use parking_lot::Mutex;

use crate::error::Error;
use crate::rpc::Code;

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A localized informational message.
    Info {
        /// Message template identifier.
        localization_key: String,
    },
    /// A failed operation.
    Error {
        /// Human-readable description.
        message: String,
        /// RPC status code, when the failure came from a service call.
        code: Option<Code>,
    },
}

impl Notification {
    /// An informational message.
    pub fn info(localization_key: impl Into<String>) -> Self {
        Notification::Info {
            localization_key: localization_key.into(),
        }
    }

    /// An error message describing `error`.
    pub fn from_error(error: &Error) -> Self {
        match error.status() {
            Some(status) => Notification::Error {
                message: status.message().to_string(),
                code: Some(status.code()),
            },
            None => Notification::Error {
                message: error.to_string(),
                code: None,
            },
        }
    }

    /// Returns `true` for error notifications.
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Info { localization_key } => write!(f, "info: {}", localization_key),
            Notification::Error {
                message,
                code: Some(code),
            } => write!(f, "error ({:?}): {}", code, message),
            Notification::Error { message, code: None } => write!(f, "error: {}", message),
        }
    }
}

/// Channel failures and confirmations are reported through.
pub trait Notifier: Send + Sync {
    /// Delivers a notification.
    fn notify(&self, notification: Notification);

    /// Reports a localized informational message.
    fn info(&self, localization_key: &str) {
        self.notify(Notification::info(localization_key));
    }

    /// Reports a failure.
    fn error(&self, error: &Error) {
        self.notify(Notification::from_error(error));
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            tracing::warn!(%notification, "notify");
        } else {
            tracing::info!(%notification, "notify");
        }
    }
}

/// Buffers notifications until the presentation layer drains them.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Number of pending notifications.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        tracing::debug!(%notification, "notification queued");
        self.pending.lock().push(notification);
    }
}
