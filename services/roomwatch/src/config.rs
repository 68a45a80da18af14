//! Configuration types for the roomwatch service

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const PUSHOVER_TOKEN_ENV: &str = "PUSHOVER_APPLICATION_TOKEN";
pub const PUSHOVER_USER_KEY_ENV: &str = "PUSHOVER_USER_KEY";
pub const NTFY_TOPIC_URL_ENV: &str = "NTFY_TOPIC_URL";

/// Text the reservation site shows when no plan matches the search
pub const DEFAULT_UNAVAILABLE_MARKER: &str =
    "申し訳ありませんが、設定された条件でご利用できるプランがないか、予約受付を停止中です。";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub notifiers: Vec<NotifierConfig>,
}

/// A reservation page to watch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Stable key used in the state file. Falls back to the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub url: String,
}

impl Target {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn identity(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.url,
        }
    }
}

/// Page fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_unavailable_marker")]
    pub unavailable_marker: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            unavailable_marker: default_unavailable_marker(),
            user_agent: default_user_agent(),
            accept: default_accept(),
        }
    }
}

/// Locations of the state file and activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_file: default_log_file(),
        }
    }
}

/// Notification dispatch settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notify_timeout")]
    pub timeout_seconds: u64,
    /// Optional first line of every message
    #[serde(default)]
    pub preamble: Option<String>,
    /// Keep a target eligible for another notification when dispatch failed
    #[serde(default)]
    pub retry_on_failure: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_notify_timeout(),
            preamble: None,
            retry_on_failure: false,
        }
    }
}

/// Notifier configuration with tagged enum for extensibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifierConfig {
    #[serde(rename = "pushover")]
    Pushover {
        #[serde(default)]
        api_token: String,
        #[serde(default)]
        user_key: String,
        #[serde(default = "default_title")]
        title: String,
        #[serde(default)]
        priority: i8,
        #[serde(default)]
        sound: Option<String>,
    },
    #[serde(rename = "ntfy")]
    Ntfy {
        #[serde(default)]
        topic_url: String,
        #[serde(default = "default_title")]
        title: String,
        #[serde(default = "default_ntfy_tags")]
        tags: Vec<String>,
        #[serde(default)]
        priority: Option<u8>,
    },
}

impl NotifierConfig {
    pub fn type_name(&self) -> &str {
        match self {
            NotifierConfig::Pushover { .. } => "pushover",
            NotifierConfig::Ntfy { .. } => "ntfy",
        }
    }
}

impl Config {
    /// Check the marker and target list before any page is fetched
    pub fn validate(&self) -> crate::Result<()> {
        if self.fetch.unavailable_marker.trim().is_empty() {
            return Err(crate::WatchError::Config(
                "fetch.unavailable_marker must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.url.trim().is_empty() {
                return Err(crate::WatchError::Config(format!(
                    "Target '{}' has an empty url",
                    target.label
                )));
            }
            if !seen.insert(target.identity()) {
                return Err(crate::WatchError::Config(format!(
                    "Duplicate target identity '{}'",
                    target.identity()
                )));
            }
        }
        Ok(())
    }

    /// Fill credentials left empty in the file from the environment
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |value: &mut String, key: &str| {
            if value.trim().is_empty() {
                if let Some(found) = lookup(key) {
                    tracing::debug!("Resolved {} from environment", key);
                    *value = found.trim().to_string();
                }
            } else {
                *value = value.trim().to_string();
            }
        };

        for notifier in &mut self.notifiers {
            match notifier {
                NotifierConfig::Pushover {
                    api_token,
                    user_key,
                    ..
                } => {
                    resolve(api_token, PUSHOVER_TOKEN_ENV);
                    resolve(user_key, PUSHOVER_USER_KEY_ENV);
                }
                NotifierConfig::Ntfy { topic_url, .. } => {
                    resolve(topic_url, NTFY_TOPIC_URL_ENV);
                }
            }
        }
        Ok(())
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_notify_timeout() -> u64 {
    10
}

fn default_unavailable_marker() -> String {
    DEFAULT_UNAVAILABLE_MARKER.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml".to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/last_status.json")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("data/log.txt")
}

fn default_title() -> String {
    "Reservation available".to_string()
}

fn default_ntfy_tags() -> Vec<String> {
    vec!["hotel".to_string()]
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
