//! LinkChecker - dispatcher and pool lifecycle.
//!
//! Submission path: `submit` -> `StatusStore::create_task` -> `WorkQueue::enqueue`.
//! Workers are owned here and started / stopped explicitly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::app::worker_pool::{WorkerContext, WorkerPool};
use crate::config::CheckerConfig;
use crate::domain::{LinkBatch, Task, TaskId, dedup_links};
use crate::error::LinkCheckError;
use crate::impls::WorkQueue;
use crate::ports::{LinkProbe, StatusStore};

pub struct LinkChecker {
    config: CheckerConfig,
    store: Arc<dyn StatusStore>,
    probe: Arc<dyn LinkProbe>,
    queue: Arc<WorkQueue>,
    pool: Mutex<Option<WorkerPool>>,
}

impl LinkChecker {
    /// Wire the components together. Workers are not running until `start`.
    pub fn new(
        config: CheckerConfig,
        store: Arc<dyn StatusStore>,
        probe: Arc<dyn LinkProbe>,
    ) -> Self {
        let queue = Arc::new(WorkQueue::new(config.queue_capacity));
        Self {
            config,
            store,
            probe,
            queue,
            pool: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<dyn StatusStore> {
        &self.store
    }

    pub fn queue(&self) -> &Arc<WorkQueue> {
        &self.queue
    }

    pub async fn is_running(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Create a task for `links` and schedule it.
    ///
    /// Duplicate links collapse into one entry. Suspends while the work queue
    /// is full.
    pub async fn submit<I, S>(&self, links: I) -> Result<TaskId, LinkCheckError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let links = dedup_links(links);
        if links.is_empty() {
            return Err(LinkCheckError::EmptyBatch);
        }

        let task_id = self.store.create_task(&links).await?;
        info!(%task_id, links = links.len(), "task submitted");

        self.queue.enqueue(LinkBatch::new(task_id, links)).await;
        Ok(task_id)
    }

    /// Known tasks among `ids`; unknown ids are omitted.
    pub async fn query(&self, ids: &[TaskId]) -> Vec<Task> {
        self.store.get_tasks(ids).await
    }

    /// Spawn the worker pool. No-op while already running.
    pub async fn start(&self) {
        let mut pool = self.pool.lock().await;
        if pool.is_some() {
            debug!("worker pool already running");
            return;
        }

        let ctx = WorkerContext {
            queue: Arc::clone(&self.queue),
            store: Arc::clone(&self.store),
            probe: Arc::clone(&self.probe),
            pacing: self.config.pacing,
        };
        *pool = Some(WorkerPool::spawn(self.config.workers, ctx));
    }

    /// Stop every worker and wait for them, then flush the store.
    ///
    /// Batches still queued are abandoned; their tasks stay `queued`.
    pub async fn stop(&self) -> Result<(), LinkCheckError> {
        let Some(pool) = self.pool.lock().await.take() else {
            debug!("worker pool not running");
            return Ok(());
        };
        pool.shutdown_and_join().await;

        let abandoned = self.queue.len().await;
        if abandoned > 0 {
            warn!(abandoned, "queued batches dropped at shutdown");
        }

        self.store.flush().await?;
        Ok(())
    }

    /// Ids of tasks that still have unfinished links.
    ///
    /// Only reports them; nothing is requeued.
    pub async fn recover_pending(&self) -> Vec<TaskId> {
        let pending = self.store.pending_task_ids().await;
        if pending.is_empty() {
            debug!("no pending tasks");
        } else {
            let ids: Vec<String> = pending.iter().map(ToString::to_string).collect();
            warn!(count = pending.len(), ids = %ids.join(","), "tasks left unfinished by a previous run");
        }
        pending
    }

    /// Poll until `task_id` is complete. `None` when the task does not exist.
    pub async fn wait_for(&self, task_id: TaskId, poll: Duration) -> Option<Task> {
        loop {
            let task = self.store.get_tasks(&[task_id]).await.into_iter().next()?;
            if task.is_complete() {
                return Some(task);
            }
            tokio::time::sleep(poll).await;
        }
    }
}
