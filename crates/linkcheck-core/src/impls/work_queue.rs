//! Bounded in-memory work queue.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

use crate::domain::LinkBatch;

/// Bounded FIFO of pending batches.
///
/// - `enqueue` takes the fast path while there is room and otherwise waits
///   for a slot (backpressure on the submitter; nothing is dropped).
/// - `dequeue` waits until a batch is available. It is cancel-safe: a batch
///   is either returned or stays in the queue, so workers can race it against
///   a shutdown signal.
///
/// Waiters register on the `Notify` while still holding the buffer lock, so
/// a slot freed between "saw full" and "started waiting" is never missed.
pub struct WorkQueue {
    buffer: Mutex<VecDeque<LinkBatch>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

impl WorkQueue {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.buffer.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buffer.lock().await.is_empty()
    }

    /// Push a batch, waiting while the queue is full.
    pub async fn enqueue(&self, batch: LinkBatch) {
        let task_id = batch.task_id();
        let mut waited = false;

        loop {
            let slot_freed = self.not_full.notified();
            tokio::pin!(slot_freed);

            {
                let mut buffer = self.buffer.lock().await;
                if buffer.len() < self.capacity {
                    buffer.push_back(batch);
                    drop(buffer);
                    self.not_empty.notify_one();
                    debug!(%task_id, waited, "batch enqueued");
                    return;
                }
                // 満杯: ロックを持ったまま待機登録してから手放す
                slot_freed.as_mut().enable();
            }

            if !waited {
                info!(%task_id, capacity = self.capacity, "work queue full, submission waiting for a free slot");
                waited = true;
            }
            slot_freed.await;
        }
    }

    /// Pop the oldest batch, waiting until one is available.
    pub async fn dequeue(&self) -> LinkBatch {
        loop {
            let batch_pushed = self.not_empty.notified();
            tokio::pin!(batch_pushed);

            {
                let mut buffer = self.buffer.lock().await;
                if let Some(batch) = buffer.pop_front() {
                    drop(buffer);
                    self.not_full.notify_one();
                    return batch;
                }
                batch_pushed.as_mut().enable();
            }

            batch_pushed.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn batch(id: u64) -> LinkBatch {
        LinkBatch::new(TaskId::new(id), vec![format!("site-{id}.com")])
    }

    #[tokio::test]
    async fn dequeue_is_fifo() {
        let queue = WorkQueue::new(10);
        for id in 1..=3 {
            queue.enqueue(batch(id)).await;
        }

        for id in 1..=3 {
            assert_eq!(queue.dequeue().await.task_id(), TaskId::new(id));
        }
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn enqueue_with_room_does_not_wait() {
        let queue = WorkQueue::new(2);
        timeout(Duration::from_millis(50), queue.enqueue(batch(1)))
            .await
            .expect("fast path should not block");
        assert_eq!(queue.len().await, 1);
        assert_eq!(queue.capacity(), 2);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped() {
        let queue = WorkQueue::new(0);
        assert_eq!(queue.capacity(), 1);
    }

    #[tokio::test]
    async fn dequeue_waits_for_enqueue() {
        let queue = Arc::new(WorkQueue::new(4));

        let waiter = tokio::spawn({
            let queue = Arc::clone(&queue);
            async move { queue.dequeue().await }
        });

        sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        queue.enqueue(batch(7)).await;
        let got = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("dequeue should wake up")
            .unwrap();
        assert_eq!(got.task_id(), TaskId::new(7));
    }

    #[tokio::test]
    async fn cancelled_dequeue_loses_nothing() {
        let queue = WorkQueue::new(4);
        assert!(
            timeout(Duration::from_millis(20), queue.dequeue())
                .await
                .is_err()
        );

        queue.enqueue(batch(1)).await;
        assert_eq!(queue.dequeue().await.task_id(), TaskId::new(1));
    }

    #[tokio::test]
    async fn full_queue_blocks_the_submitter() {
        let queue = Arc::new(WorkQueue::new(1));
        queue.enqueue(batch(1)).await;

        let blocked = tokio::spawn({
            let queue = Arc::clone(&queue);
            async move { queue.enqueue(batch(2)).await }
        });

        sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished(), "second enqueue should be waiting");
        assert_eq!(queue.len().await, 1);

        assert_eq!(queue.dequeue().await.task_id(), TaskId::new(1));
        timeout(Duration::from_secs(1), blocked)
            .await
            .expect("freed slot should unblock the submitter")
            .unwrap();
        assert_eq!(queue.dequeue().await.task_id(), TaskId::new(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn one_freed_slot_unblocks_exactly_one_submitter() {
        let queue = Arc::new(WorkQueue::new(1));
        queue.enqueue(batch(1)).await;

        let blocked: Vec<_> = (2..=3)
            .map(|id| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.enqueue(batch(id)).await })
            })
            .collect();

        sleep(Duration::from_millis(50)).await;
        assert!(blocked.iter().all(|h| !h.is_finished()));

        queue.dequeue().await;
        sleep(Duration::from_millis(50)).await;

        let finished = blocked.iter().filter(|h| h.is_finished()).count();
        assert_eq!(finished, 1);
        assert_eq!(queue.len().await, 1);

        // drain the rest so the remaining submitter completes
        queue.dequeue().await;
        for handle in blocked {
            timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
        }
        assert_eq!(queue.len().await, 1);
    }
}
