//! LinkBatch - the work item that travels through the work queue.

use std::collections::HashSet;

use super::TaskId;

/// TaskId + links, in submission order.
///
/// The queue owns a batch between enqueue and dequeue; after that it belongs
/// to exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBatch {
    task_id: TaskId,
    links: Vec<String>,
}

impl LinkBatch {
    pub fn new(task_id: TaskId, links: Vec<String>) -> Self {
        Self { task_id, links }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Drop repeated links, keeping the first occurrence.
pub fn dedup_links<I, S>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .map(Into::into)
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
