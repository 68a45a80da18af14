//! Reservation page classifier
//!
//! Fetches a target page once and decides availability by looking for the
//! fixed "no availability" marker in the response body.

use std::sync::Arc;

use crate::check::{Availability, CheckResult};
use crate::config::{FetchConfig, Target};
use crate::io::HttpClient;

/// Classifies reservation pages by the presence of an unavailable marker
pub struct PageClassifier {
    marker: String,
    user_agent: String,
    accept: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageClassifier")
            .field("marker", &self.marker)
            .finish()
    }
}

impl PageClassifier {
    pub fn new(config: &FetchConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            "Created PageClassifier with {} byte marker",
            config.unavailable_marker.len()
        );

        Self {
            marker: config.unavailable_marker.clone(),
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
            http,
        }
    }

    /// Fetch `target` once and classify it
    pub async fn classify(&self, target: &Target) -> CheckResult {
        let headers = [
            ("User-Agent", self.user_agent.as_str()),
            ("Accept", self.accept.as_str()),
        ];

        match self.http.get(&target.url, &headers).await {
            Ok(response) => {
                let availability = classify_body(&response.body, &self.marker);
                tracing::debug!(
                    "Classified '{}': status={} {}",
                    target.label,
                    response.status,
                    availability
                );
                CheckResult::observed(target, availability, response.status)
            }
            Err(e) => {
                tracing::debug!("Failed to fetch '{}': {}", target.label, e);
                CheckResult::failed(target, e.to_string())
            }
        }
    }
}

/// Available unless the marker occurs anywhere in the body
pub fn classify_body(body: &str, marker: &str) -> Availability {
    Availability::from_bool(!body.contains(marker))
}
