//! WorkerPool - fixed set of link-check workers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{LinkBatch, LinkStatus};
use crate::impls::WorkQueue;
use crate::ports::{LinkProbe, StatusStore};

/// Everything a worker needs. Cloned into each worker task.
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<WorkQueue>,
    pub store: Arc<dyn StatusStore>,
    pub probe: Arc<dyn LinkProbe>,
    /// Pause after each link, bounds the outbound request rate per worker.
    pub pacing: Duration,
}

/// Worker pool handle.
/// - dropping `shutdown_tx` stops every worker as well
/// - `shutdown_and_join()` waits until all workers have returned
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `n` workers on the current runtime.
    pub fn spawn(n: usize, ctx: WorkerContext) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut joins = Vec::with_capacity(n);
        for worker_id in 1..=n {
            let ctx = ctx.clone();
            let rx = shutdown_rx.clone();
            joins.push(tokio::spawn(worker_loop(worker_id, ctx, rx)));
        }
        info!(workers = n, "worker pool started");

        Self { shutdown_tx, joins }
    }

    pub fn size(&self) -> usize {
        self.joins.len()
    }

    /// Ask every worker to stop taking new batches.
    /// A worker in the middle of a batch finishes that batch first.
    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for all workers.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            if let Err(err) = join.await {
                warn!(error = %err, "worker task ended abnormally");
            }
        }
        info!("worker pool stopped");
    }
}

async fn worker_loop(worker_id: usize, ctx: WorkerContext, mut shutdown_rx: watch::Receiver<bool>) {
    debug!(worker_id, "worker started");

    loop {
        // shutdown が来ていたら抜ける
        if *shutdown_rx.borrow() {
            break;
        }

        // dequeue は待つ可能性があるので shutdown と競合させる
        let batch = tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // sender dropped: pool handle is gone
                    break;
                }
                continue;
            }
            batch = ctx.queue.dequeue() => batch,
        };

        process_batch(worker_id, &ctx, batch).await;
    }

    debug!(worker_id, "worker stopped");
}

/// Check every link of `batch` in order. Store failures are logged and the
/// worker moves on; nothing here aborts the batch.
async fn process_batch(worker_id: usize, ctx: &WorkerContext, batch: LinkBatch) {
    let task_id = batch.task_id();
    info!(worker_id, %task_id, links = batch.len(), "processing batch");

    for link in batch.links() {
        if let Err(err) = ctx
            .store
            .update_status(task_id, link, LinkStatus::Checking)
            .await
        {
            warn!(worker_id, %task_id, link = %link, error = %err, "could not mark link as checking");
        }

        let status = LinkStatus::from(ctx.probe.check(link).await);

        if let Err(err) = ctx.store.update_status(task_id, link, status).await {
            warn!(worker_id, %task_id, link = %link, %status, error = %err, "could not record link status, result discarded");
        } else {
            debug!(worker_id, %task_id, link = %link, %status, "link checked");
        }

        tokio::time::sleep(ctx.pacing).await;
    }

    info!(worker_id, %task_id, "batch finished");
}
