//! Status - per-task summary view.

use serde::{Deserialize, Serialize};

use crate::domain::{LinkStatus, Task};

/// Number of links in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub queued: usize,
    pub checking: usize,
    pub available: usize,
    pub not_available: usize,
}

impl LinkCounts {
    pub fn of(task: &Task) -> Self {
        let mut counts = Self::default();
        for status in task.links.values() {
            match status {
                LinkStatus::Queued => counts.queued += 1,
                LinkStatus::Checking => counts.checking += 1,
                LinkStatus::Available => counts.available += 1,
                LinkStatus::NotAvailable => counts.not_available += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.queued + self.checking + self.available + self.not_available
    }

    /// Links that have not reached a terminal status yet.
    pub fn pending(&self) -> usize {
        self.queued + self.checking
    }
}
