//! User-visible notifications raised by list operations.
//!
//! The list controller never renders anything itself; it hands a
//! [`Notification`] to whatever [`Notifier`] the UI layer installed.

use std::fmt;

/// Outcome carried by a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Failure => write!(f, "failure"),
        }
    }
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Failure, message)
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Receiver for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// Forwards notifications to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!("{}", notification.message),
            NotificationKind::Failure => tracing::warn!("{}", notification.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_constructors() {
        let ok = Notification::success("Updated.");
        assert!(ok.is_success());
        assert_eq!(ok.message, "Updated.");

        let err = Notification::failure("Couldn't update the ticket.");
        assert_eq!(err.kind, NotificationKind::Failure);
    }

    #[test]
    fn test_closure_notifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let notifier = move |n: &Notification| sink.lock().push(n.clone());

        notifier.notify(&Notification::success("done"));
        assert_eq!(seen.lock().len(), 1);
    }
}
