//! Link status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one link inside a task.
///
/// State transitions:
/// - Queued -> Checking -> Available
/// - Queued -> Checking -> NotAvailable
///
/// A resolved link never goes back to Queued or Checking; re-checking a link
/// means submitting a new task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStatus {
    /// Submitted, waiting for a worker.
    #[serde(rename = "queued")]
    Queued,

    /// A worker is probing the link right now.
    #[serde(rename = "checking")]
    Checking,

    /// The probe got a response in [200, 400).
    #[serde(rename = "available")]
    Available,

    /// Network error, timeout, or any other status code.
    #[serde(rename = "not available")]
    NotAvailable,
}

impl LinkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Queued => "queued",
            LinkStatus::Checking => "checking",
            LinkStatus::Available => "available",
            LinkStatus::NotAvailable => "not available",
        }
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, LinkStatus::Available | LinkStatus::NotAvailable)
    }

    /// Whether `next` is a legal forward step from `self`.
    pub fn can_transition_to(self, next: LinkStatus) -> bool {
        matches!(
            (self, next),
            (LinkStatus::Queued, LinkStatus::Checking)
                | (LinkStatus::Checking, LinkStatus::Available)
                | (LinkStatus::Checking, LinkStatus::NotAvailable)
        )
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single probe. Only the two terminal statuses are possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    NotAvailable,
}

impl From<Availability> for LinkStatus {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Available => LinkStatus::Available,
            Availability::NotAvailable => LinkStatus::NotAvailable,
        }
    }
}
