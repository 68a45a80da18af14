//! Watch cycle: checks every target once, notifies on openings, persists state

use crate::activity_log::{ActivityLog, LogEntry};
use crate::check::{Availability, CheckOutcome};
use crate::classifier::PageClassifier;
use crate::config::{Config, Target};
use crate::notifier::{DispatchOutcome, NotificationDispatcher};
use crate::state::{PersistedState, StateStore};

/// What happened to one target during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    Checked {
        availability: Availability,
        status_code: u16,
        /// Set when the target just opened and a dispatch was attempted
        notification: Option<DispatchOutcome>,
    },
    Failed {
        message: String,
    },
}

/// Per-target entry of a [`CycleSummary`]
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub identity: String,
    pub label: String,
    pub outcome: TargetOutcome,
}

impl TargetReport {
    pub fn notified(&self) -> bool {
        matches!(
            &self.outcome,
            TargetOutcome::Checked {
                notification: Some(DispatchOutcome { success: true, .. }),
                ..
            }
        )
    }

    /// Single status line for the operator
    pub fn status_line(&self) -> String {
        match &self.outcome {
            TargetOutcome::Checked {
                availability,
                status_code,
                ..
            } => format!(
                "[{}] status={} status_code={}",
                self.label, availability, status_code
            ),
            TargetOutcome::Failed { .. } => {
                format!("[{}] status=error status_code=none", self.label)
            }
        }
    }
}

/// Result of one run over all targets
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    pub reports: Vec<TargetReport>,
}

impl CycleSummary {
    /// True when there was at least one target and every check failed
    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty()
            && self
                .reports
                .iter()
                .all(|r| matches!(r.outcome, TargetOutcome::Failed { .. }))
    }

    pub fn notifications_sent(&self) -> usize {
        self.reports.iter().filter(|r| r.notified()).count()
    }
}

/// Orchestrates classifier, state store, dispatcher and activity log
#[derive(Debug)]
pub struct WatchCycle {
    targets: Vec<Target>,
    classifier: PageClassifier,
    dispatcher: NotificationDispatcher,
    state_store: StateStore,
    activity_log: ActivityLog,
    preamble: Option<String>,
    retry_on_failure: bool,
}

impl WatchCycle {
    pub fn new(
        config: &Config,
        classifier: PageClassifier,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            targets: config.targets.clone(),
            classifier,
            dispatcher,
            state_store: StateStore::new(&config.storage.state_file),
            activity_log: ActivityLog::new(&config.storage.log_file),
            preamble: config.notification.preamble.clone(),
            retry_on_failure: config.notification.retry_on_failure,
        }
    }

    /// Check all targets in order and save state once at the end
    ///
    /// Per-target failures are reported in the summary. Only a failure to
    /// save the state file is returned as an error.
    pub async fn run(&self) -> crate::Result<CycleSummary> {
        self.run_reporting(|_| {}).await
    }

    /// Like [`run`](Self::run), handing each report to `on_report` as soon as
    /// its target has been processed
    ///
    /// Reports already handed out stay delivered when the final save fails.
    pub async fn run_reporting<F>(&self, mut on_report: F) -> crate::Result<CycleSummary>
    where
        F: FnMut(&TargetReport),
    {
        let previous = self.state_store.load();
        let mut working = previous.clone();
        let mut summary = CycleSummary::default();

        tracing::info!("Checking {} target(s)", self.targets.len());

        for target in &self.targets {
            let report = self.check_target(target, &previous, &mut working).await;
            on_report(&report);
            summary.reports.push(report);
        }

        if summary.all_failed() {
            tracing::warn!("All {} target checks failed", summary.reports.len());
        }

        if let Err(e) = self.state_store.save(&working) {
            tracing::error!(
                "Failed to save state to {:?}: {}. The next run may notify again.",
                self.state_store.path(),
                e
            );
            return Err(e);
        }

        tracing::info!(
            "Cycle complete: {} target(s), {} notification(s) sent",
            summary.reports.len(),
            summary.notifications_sent()
        );
        Ok(summary)
    }

    /// Process one target against the state loaded at the start of the run
    pub async fn check_target(
        &self,
        target: &Target,
        previous: &PersistedState,
        working: &mut PersistedState,
    ) -> TargetReport {
        let result = self.classifier.classify(target).await;
        let identity = target.identity().to_string();

        let (availability, status_code) = match result.outcome {
            CheckOutcome::Observed {
                availability,
                status_code,
            } => (availability, status_code),
            CheckOutcome::Failed { message } => {
                tracing::warn!("Check of '{}' failed: {}", target.label, message);
                return TargetReport {
                    identity,
                    label: target.label.clone(),
                    outcome: TargetOutcome::Failed { message },
                };
            }
        };

        let available = availability.is_available();
        let was_available = previous.get(&identity);
        let mut notification = None;
        let mut advance_state = true;

        if is_just_opened(available, was_available) {
            let message = build_message(target, self.preamble.as_deref());
            let outcome = self.dispatcher.send(&message).await;
            if outcome.success {
                tracing::info!("Notified opening of '{}': {}", target.label, outcome.detail);
            } else {
                tracing::warn!(
                    "Could not notify opening of '{}': {}. Check notifier credentials and network access.",
                    target.label,
                    outcome.detail
                );
                advance_state = !self.retry_on_failure;
            }
            notification = Some(outcome);
        }

        if advance_state {
            working.set(&identity, available);
        }

        let notified = notification.as_ref().is_some_and(|n| n.success);
        let entry = LogEntry::now(target.label.clone(), availability, notified);
        if let Err(e) = self.activity_log.append(&entry) {
            tracing::error!(
                "Failed to append to activity log {:?}: {}",
                self.activity_log.path(),
                e
            );
        }

        TargetReport {
            identity,
            label: target.label.clone(),
            outcome: TargetOutcome::Checked {
                availability,
                status_code,
                notification,
            },
        }
    }
}

/// Rising edge: available now, not available at the last recorded check
pub fn is_just_opened(available: bool, was_available: bool) -> bool {
    available && !was_available
}

/// Notification text: optional preamble, then label and URL on their own lines
pub fn build_message(target: &Target, preamble: Option<&str>) -> String {
    match preamble {
        Some(preamble) if !preamble.is_empty() => {
            format!("{}\n{}\n{}", preamble, target.label, target.url)
        }
        _ => format!("{}\n{}", target.label, target.url),
    }
}
