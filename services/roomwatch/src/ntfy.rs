//! ntfy topic notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{NotifierConfig, NTFY_TOPIC_URL_ENV};
use crate::io::HttpClient;
use crate::notifier::{Notification, Notifier};

/// Publishes plain text messages to an ntfy topic URL
pub struct NtfyNotifier {
    topic_url: String,
    default_title: String,
    default_tags: Vec<String>,
    priority: Option<u8>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for NtfyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtfyNotifier")
            .field("default_title", &self.default_title)
            .field("default_tags", &self.default_tags)
            .finish()
    }
}

impl NtfyNotifier {
    pub fn new(topic_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            topic_url: topic_url.into(),
            default_title: "Reservation available".to_string(),
            default_tags: Vec::new(),
            priority: None,
            http,
        }
    }

    /// Build from an `ntfy` notifier config; `None` for other providers
    pub fn from_config(config: &NotifierConfig, http: Arc<dyn HttpClient>) -> Option<Self> {
        let NotifierConfig::Ntfy {
            topic_url,
            title,
            tags,
            priority,
        } = config
        else {
            return None;
        };

        tracing::debug!("Created NtfyNotifier with title '{}'", title);

        Some(Self {
            topic_url: topic_url.clone(),
            default_title: title.clone(),
            default_tags: tags.clone(),
            priority: *priority,
            http,
        })
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    fn type_name(&self) -> &str {
        "ntfy"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<String> {
        if self.topic_url.is_empty() {
            return Err(crate::WatchError::MissingCredentials(format!(
                "ntfy topic URL ({}) is not set",
                NTFY_TOPIC_URL_ENV
            )));
        }

        let title = if notification.title.is_empty() {
            self.default_title.as_str()
        } else {
            notification.title.as_str()
        };
        let tags = if notification.tags.is_empty() {
            self.default_tags.join(",")
        } else {
            notification.tags.join(",")
        };
        let priority = if notification.priority > 0 {
            Some(notification.priority.to_string())
        } else {
            self.priority.map(|p| p.to_string())
        };

        let mut headers = vec![("Title", title)];
        if !tags.is_empty() {
            headers.push(("Tags", tags.as_str()));
        }
        if let Some(priority) = &priority {
            headers.push(("Priority", priority.as_str()));
        }

        tracing::debug!("Publishing ntfy notification: title='{}'", title);

        let response = self
            .http
            .post_text(&self.topic_url, &headers, &notification.message)
            .await?;

        if !response.is_success() {
            return Err(crate::WatchError::Notifier(format!(
                "ntfy returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("ntfy notification published");
        Ok("ntfy notification published".to_string())
    }
}
