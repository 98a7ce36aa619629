use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Banner severity, named after the bootstrap alert classes the shell renders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    /// Only actionable alerts can be dismissed for the session
    pub fn is_dismissible(self) -> bool {
        matches!(self, Self::Warning | Self::Danger)
    }
}

/// Identity of a notification: the same severity and text is the same notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationKey {
    pub severity: Severity,
    pub message: String,
}

impl NotificationKey {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// A banner shown by the shell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub dismissible: bool,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            dismissible: severity.is_dismissible(),
        }
    }

    pub fn key(&self) -> NotificationKey {
        NotificationKey::new(self.severity, self.message.clone())
    }
}

/// Notifications the user closed during this session.
///
/// Dismissal cannot be undone; only warning and danger keys are recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationDismissalStore {
    dismissed: BTreeSet<NotificationKey>,
}

impl NotificationDismissalStore {
    pub fn is_dismissed(&self, key: &NotificationKey) -> bool {
        key.severity.is_dismissible() && self.dismissed.contains(key)
    }

    /// Records `key`; returns `false` if it was ignored or already present
    pub fn dismiss(&mut self, key: NotificationKey) -> bool {
        if !key.severity.is_dismissible() {
            log::debug!("ignoring dismissal of {:?} notification", key.severity);
            return false;
        }
        self.dismissed.insert(key)
    }

    /// Re-seeds the store from keys the shell kept in session storage
    pub fn restore(&mut self, keys: impl IntoIterator<Item = NotificationKey>) {
        for key in keys {
            self.dismiss(key);
        }
    }

    /// Passes a notification through unless its key was dismissed
    pub fn filter(&self, notification: Notification) -> Option<Notification> {
        if notification.dismissible && self.is_dismissed(&notification.key()) {
            None
        } else {
            Some(notification)
        }
    }

    pub fn len(&self) -> usize {
        self.dismissed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dismissed.is_empty()
    }
}
