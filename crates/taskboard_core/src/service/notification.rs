//! Transient user-facing notifications ("toasts").

use log::{info, warn};
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "ok: {}", self.message),
            NotificationLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// FIFO queue drained by the front end after each action.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("event=notify module=service level=success message={message}");
        self.queue.push_back(Notification {
            level: NotificationLevel::Success,
            message,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("event=notify module=service level=error message={message}");
        self.queue.push_back(Notification {
            level: NotificationLevel::Error,
            message,
        });
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    /// Removes and returns all pending notifications in arrival order.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationLevel, Notifications};

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut notifications = Notifications::default();
        notifications.success("saved");
        notifications.error("boom");
        assert_eq!(notifications.last().unwrap().level, NotificationLevel::Error);

        let drained = notifications.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "saved");
        assert_eq!(drained[1].to_string(), "error: boom");
        assert!(notifications.is_empty());
    }
}
