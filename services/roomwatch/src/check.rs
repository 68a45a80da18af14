//! Outcome types of a single availability check

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Target;

/// Observed availability of a reservation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn from_bool(available: bool) -> Self {
        if available {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        self == Availability::Available
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// What a check produced: an observation, or a transport failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Observed {
        availability: Availability,
        status_code: u16,
    },
    Failed {
        message: String,
    },
}

/// Result of classifying one target
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub target: Target,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn observed(target: &Target, availability: Availability, status_code: u16) -> Self {
        Self {
            target: target.clone(),
            outcome: CheckOutcome::Observed {
                availability,
                status_code,
            },
        }
    }

    pub fn failed(target: &Target, message: impl Into<String>) -> Self {
        Self {
            target: target.clone(),
            outcome: CheckOutcome::Failed {
                message: message.into(),
            },
        }
    }

    /// Availability, or `None` when the check failed and nothing is known
    pub fn availability(&self) -> Option<Availability> {
        match &self.outcome {
            CheckOutcome::Observed { availability, .. } => Some(*availability),
            CheckOutcome::Failed { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match &self.outcome {
            CheckOutcome::Observed { status_code, .. } => Some(*status_code),
            CheckOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CheckOutcome::Observed { .. } => None,
            CheckOutcome::Failed { message } => Some(message),
        }
    }
}
