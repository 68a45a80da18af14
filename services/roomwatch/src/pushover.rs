//! Pushover notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{NotifierConfig, PUSHOVER_TOKEN_ENV, PUSHOVER_USER_KEY_ENV};
use crate::io::HttpClient;
use crate::notifier::{Notification, Notifier};

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Pushover notification sender
pub struct PushoverNotifier {
    api_token: String,
    user_key: String,
    default_title: String,
    default_priority: i8,
    sound: Option<String>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("default_title", &self.default_title)
            .finish()
    }
}

impl PushoverNotifier {
    pub fn new(
        api_token: impl Into<String>,
        user_key: impl Into<String>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            user_key: user_key.into(),
            default_title: "Reservation available".to_string(),
            default_priority: 0,
            sound: None,
            http,
        }
    }

    /// Build from a `pushover` notifier config; `None` for other providers
    pub fn from_config(config: &NotifierConfig, http: Arc<dyn HttpClient>) -> Option<Self> {
        let NotifierConfig::Pushover {
            api_token,
            user_key,
            title,
            priority,
            sound,
        } = config
        else {
            return None;
        };

        tracing::debug!("Created PushoverNotifier with title '{}'", title);

        Some(Self {
            api_token: api_token.clone(),
            user_key: user_key.clone(),
            default_title: title.clone(),
            default_priority: *priority,
            sound: sound.clone(),
            http,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn type_name(&self) -> &str {
        "pushover"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<String> {
        if self.api_token.is_empty() || self.user_key.is_empty() {
            return Err(crate::WatchError::MissingCredentials(format!(
                "Pushover credentials ({}, {}) are not set",
                PUSHOVER_TOKEN_ENV, PUSHOVER_USER_KEY_ENV
            )));
        }

        let title = if notification.title.is_empty() {
            self.default_title.as_str()
        } else {
            notification.title.as_str()
        };
        let priority = if notification.priority != 0 {
            notification.priority
        } else {
            self.default_priority
        };

        let priority_str = priority.to_string();
        let mut params = vec![
            ("token", self.api_token.as_str()),
            ("user", self.user_key.as_str()),
            ("title", title),
            ("message", notification.message.as_str()),
            ("priority", priority_str.as_str()),
        ];
        if let Some(sound) = &self.sound {
            params.push(("sound", sound.as_str()));
        }

        tracing::debug!(
            "Sending Pushover notification: title='{}', priority={}",
            title,
            priority
        );

        let response = self.http.post_form(PUSHOVER_API_URL, &params).await?;

        if !response.is_success() {
            return Err(crate::WatchError::Notifier(format!(
                "Pushover API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Pushover notification sent successfully");
        Ok("Pushover notification sent".to_string())
    }
}
