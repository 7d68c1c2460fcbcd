//! Notification capability: transient messages and confirmation prompts.

use std::sync::{Arc, Mutex};

/// Shown whenever a request fails before the server could answer.
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn unreachable() -> Self {
        Self::error(UNREACHABLE_MESSAGE)
    }

    /// Maps an envelope outcome to a notification carrying the server text.
    pub fn from_outcome(status: bool, message: &str, fallback: &str) -> Self {
        let text = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message.to_string()
        };
        if status {
            Self::success(text)
        } else {
            Self::error(text)
        }
    }
}

pub trait Notifier {
    /// Presents a transient message.
    fn notify(&self, notification: Notification);

    /// Asks the user to confirm an action; `false` means declined.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        (**self).confirm(title, message)
    }
}

/// Keeps notifications in memory and answers confirmations with a preset
/// reply. Used by headless callers and tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    log: Mutex<Vec<Notification>>,
    confirmations: Mutex<Vec<String>>,
    answer: bool,
}

impl MemoryNotifier {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Titles of the confirmations requested so far.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut log) = self.log.lock() {
            log.push(notification);
        }
    }

    fn confirm(&self, title: &str, _message: &str) -> bool {
        if let Ok(mut asked) = self.confirmations.lock() {
            asked.push(title.to_string());
        }
        self.answer
    }
}
