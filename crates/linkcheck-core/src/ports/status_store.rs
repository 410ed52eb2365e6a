//! StatusStore port - the authoritative record of tasks and link statuses.

use async_trait::async_trait;

use crate::domain::{LinkStatus, Task, TaskId};
use crate::error::StoreError;

/// StatusStore owns every Task record.
///
/// # Contract
/// - Mutations are atomic with respect to each other and are persisted
///   before the call returns (write-through).
/// - Reads return owned copies; callers never see the internal map.
/// - Unknown ids are an error for `update_status` and silently skipped by
///   `get_tasks`.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Allocate the next id and record every link as `queued`.
    async fn create_task(&self, links: &[String]) -> Result<TaskId, StoreError>;

    /// Set one link's status. Last write wins.
    async fn update_status(
        &self,
        task_id: TaskId,
        link: &str,
        status: LinkStatus,
    ) -> Result<(), StoreError>;

    /// Tasks for the ids that exist, in request order.
    async fn get_tasks(&self, ids: &[TaskId]) -> Vec<Task>;

    /// Ids of tasks that still have a non-terminal link, ascending.
    async fn pending_task_ids(&self) -> Vec<TaskId>;

    /// Write the current state to the backing medium again.
    async fn flush(&self) -> Result<(), StoreError>;
}
