//! Task record: one submitted batch and the current status of each link.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LinkStatus, TaskId};

/// Links + statuses for one submitted batch.
///
/// Design:
/// - This is what the status store persists and what queries return.
/// - Links are unique within a task; the map keeps the file output stable.
/// - All status changes go through `set_status` so `updated_at` never lags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub links: BTreeMap<String, LinkStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New task with every link `queued`.
    pub fn new<I, S>(id: TaskId, links: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            links: links
                .into_iter()
                .map(|link| (link.into(), LinkStatus::Queued))
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a link's status and bump `updated_at`. Returns the previous status.
    pub fn set_status(
        &mut self,
        link: &str,
        status: LinkStatus,
        now: DateTime<Utc>,
    ) -> Option<LinkStatus> {
        self.updated_at = now;
        self.links.insert(link.to_string(), status)
    }

    pub fn status_of(&self, link: &str) -> Option<LinkStatus> {
        self.links.get(link).copied()
    }

    /// True once every link has a terminal status.
    pub fn is_complete(&self) -> bool {
        self.links.values().all(|status| status.is_terminal())
    }

    pub fn has_unavailable(&self) -> bool {
        self.links
            .values()
            .any(|status| *status == LinkStatus::NotAvailable)
    }
}
