//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Availability, LinkStatus, Task, TaskId};
use crate::error::StoreError;
use crate::impls::JsonFileStore;
use crate::ports::{LinkProbe, StatusStore};

/// Probe with canned answers. Unknown links are `NotAvailable`.
#[derive(Default)]
pub struct FakeProbe {
    answers: HashMap<String, Availability>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, link: &str, availability: Availability) -> Self {
        self.answers.insert(link.to_string(), availability);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkProbe for FakeProbe {
    async fn check(&self, link: &str) -> Availability {
        self.calls.lock().unwrap().push(link.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answers
            .get(link)
            .copied()
            .unwrap_or(Availability::NotAvailable)
    }
}

/// One successful `update_status` call as seen by `RecordingStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWrite {
    pub task_id: TaskId,
    pub link: String,
    pub status: LinkStatus,
}

/// In-memory store that remembers every status write in order.
pub struct RecordingStore {
    inner: JsonFileStore,
    writes: Mutex<Vec<StatusWrite>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: JsonFileStore::in_memory(),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<StatusWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Status history of one link, oldest first.
    pub fn history(&self, task_id: TaskId, link: &str) -> Vec<LinkStatus> {
        self.writes()
            .into_iter()
            .filter(|w| w.task_id == task_id && w.link == link)
            .map(|w| w.status)
            .collect()
    }
}

#[async_trait]
impl StatusStore for RecordingStore {
    async fn create_task(&self, links: &[String]) -> Result<TaskId, StoreError> {
        self.inner.create_task(links).await
    }

    async fn update_status(
        &self,
        task_id: TaskId,
        link: &str,
        status: LinkStatus,
    ) -> Result<(), StoreError> {
        self.inner.update_status(task_id, link, status).await?;
        self.writes.lock().unwrap().push(StatusWrite {
            task_id,
            link: link.to_string(),
            status,
        });
        Ok(())
    }

    async fn get_tasks(&self, ids: &[TaskId]) -> Vec<Task> {
        self.inner.get_tasks(ids).await
    }

    async fn pending_task_ids(&self) -> Vec<TaskId> {
        self.inner.pending_task_ids().await
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.inner.flush().await
    }
}

/// Poll `condition` every 10ms until it holds; panics after 5s.
pub async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
