//! User-facing notifications raised by client operations

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Collects notifications in the order they were raised
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    history: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let notification = Notification {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        };
        info!(title = %notification.title, message = %notification.message, "Notification");
        self.history.push(notification);
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let notification = Notification {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        };
        warn!(title = %notification.title, message = %notification.message, "Error notification");
        self.history.push(notification);
    }

    pub fn last(&self) -> Option<&Notification> {
        self.history.last()
    }

    pub fn history(&self) -> &[Notification] {
        &self.history
    }

    /// Take every pending notification, leaving the history empty
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_keep_order() {
        let mut notifier = Notifier::new();
        notifier.success("Saved", "Hero image created");
        notifier.error("Error", "Network unreachable");

        assert_eq!(notifier.history().len(), 2);
        assert!(notifier.last().unwrap().is_error());

        let drained = notifier.drain();
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert!(notifier.last().is_none());
    }
}
