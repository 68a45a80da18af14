//! Roomwatch - reservation availability watcher
//!
//! Checks reservation pages for the "no availability" marker, remembers the
//! last observation per page, and sends a push notification when a page
//! goes from unavailable to available.

pub mod activity_log;
pub mod check;
pub mod classifier;
pub mod config;
pub mod cycle;
pub mod error;
pub mod io;
pub mod notifier;
pub mod ntfy;
pub mod pushover;
pub mod state;

pub use config::{load_config, Config, Target};
pub use cycle::{CycleSummary, TargetReport, WatchCycle};
pub use error::{Result, WatchError};

use std::sync::Arc;
use std::time::Duration;

use crate::classifier::PageClassifier;
use crate::config::NotifierConfig;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::{NotificationDispatcher, Notifier};
use crate::ntfy::NtfyNotifier;
use crate::pushover::PushoverNotifier;

/// Build a dispatcher with one notifier per configured provider
pub fn build_dispatcher(
    configs: &[NotifierConfig],
    http: Arc<dyn HttpClient>,
) -> NotificationDispatcher {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
    for notifier_config in configs {
        let notifier: Option<Arc<dyn Notifier>> = match notifier_config {
            NotifierConfig::Pushover { .. } => {
                PushoverNotifier::from_config(notifier_config, Arc::clone(&http))
                    .map(|n| Arc::new(n) as Arc<dyn Notifier>)
            }
            NotifierConfig::Ntfy { .. } => {
                NtfyNotifier::from_config(notifier_config, Arc::clone(&http))
                    .map(|n| Arc::new(n) as Arc<dyn Notifier>)
            }
        };
        notifiers.extend(notifier);
    }

    if notifiers.is_empty() {
        tracing::warn!("No notifiers configured; openings will only be logged");
    }
    NotificationDispatcher::new(notifiers)
}

/// Run one watch cycle with the given configuration
pub async fn run(config: Config) -> Result<CycleSummary> {
    run_reporting(config, |_| {}).await
}

/// Run one watch cycle, passing each target report to `on_report` as it completes
pub async fn run_reporting<F>(config: Config, on_report: F) -> Result<CycleSummary>
where
    F: FnMut(&TargetReport),
{
    config.validate()?;

    let fetch_http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        Duration::from_secs(config.fetch.timeout_seconds),
    )?);
    let notify_http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        Duration::from_secs(config.notification.timeout_seconds),
    )?);

    let classifier = PageClassifier::new(&config.fetch, fetch_http);
    let dispatcher = build_dispatcher(&config.notifiers, notify_http);
    let cycle = WatchCycle::new(&config, classifier, dispatcher);

    cycle.run_reporting(on_report).await
}
