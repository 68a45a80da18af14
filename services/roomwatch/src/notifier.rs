//! Notifier trait and the dispatcher that fans a message out to providers

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A notification to be sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: i8,
    pub tags: Vec<String>,
}

impl Notification {
    /// Message-only notification; providers fill in their defaults
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "pushover")
    fn type_name(&self) -> &str;

    /// Send a notification, returning a confirmation detail
    async fn notify(&self, notification: &Notification) -> crate::Result<String>;
}

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub success: bool,
    pub detail: String,
}

/// Sends a message through every configured notifier, once each
#[derive(Debug, Clone, Default)]
pub struct NotificationDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Succeeds when at least one provider acknowledged the message
    pub async fn send(&self, message: &str) -> DispatchOutcome {
        if self.notifiers.is_empty() {
            return DispatchOutcome {
                success: false,
                detail: "no notification channel configured".to_string(),
            };
        }

        let notification = Notification::message(message);
        let mut success = false;
        let mut details = Vec::with_capacity(self.notifiers.len());

        for notifier in &self.notifiers {
            match notifier.notify(&notification).await {
                Ok(detail) => {
                    success = true;
                    details.push(detail);
                }
                Err(e) => {
                    tracing::warn!("Notification via '{}' failed: {}", notifier.type_name(), e);
                    details.push(format!("{}: {}", notifier.type_name(), e));
                }
            }
        }

        DispatchOutcome {
            success,
            detail: details.join("; "),
        }
    }
}
