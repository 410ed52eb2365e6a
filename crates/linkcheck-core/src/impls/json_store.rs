//! JsonFileStore - status store backed by a single JSON file.
//!
//! Every mutation rewrites the whole file before returning. The file is
//! written next to the target and renamed over it, so a reader never sees a
//! half-written document (a crash mid-write can still lose the update).

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{LinkStatus, Task, TaskId};
use crate::error::StoreError;
use crate::ports::{Clock, StatusStore, SystemClock};

/// On-disk document: all tasks plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoreState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: TaskId::FIRST,
        }
    }
}

impl StoreState {
    /// Make sure the counter is ahead of every stored id, so a hand-edited
    /// file can't make us hand out an id twice.
    fn repair_counter(&mut self) {
        let floor = self
            .tasks
            .keys()
            .next_back()
            .map(|max| max.next())
            .unwrap_or(TaskId::FIRST);
        if self.next_id < floor {
            warn!(next_id = %self.next_id, repaired = %floor, "store counter behind stored tasks");
            self.next_id = floor;
        }
    }
}

/// Status store guarded by one readers-writer lock.
///
/// - Reads (`get_tasks`, `pending_task_ids`) share the read lock.
/// - Mutations take the write lock and persist while still holding it, so
///   the file always reflects a state that existed in memory.
pub struct JsonFileStore {
    state: RwLock<StoreState>,
    path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl JsonFileStore {
    /// Store without a backing file.
    ///
    /// With no `path`, `persist` is a no-op: every mutation stays in memory.
    pub fn in_memory() -> Self {
        Self::with_state(StoreState::default(), None)
    }

    /// Open `path`, failing on unreadable or malformed content.
    /// A missing file is a cold start, not an error.
    pub async fn try_open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = load(&path).await?;
        info!(
            path = %path.display(),
            tasks = state.tasks.len(),
            next_id = %state.next_id,
            "status store loaded"
        );
        Ok(Self::with_state(state, Some(path)))
    }

    /// Open `path`, falling back to an empty store when loading fails.
    ///
    /// The load failure is handed back so the caller can report it; the
    /// returned store is usable either way and will overwrite the file on
    /// its first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> (Self, Option<StoreError>) {
        let path = path.into();
        match Self::try_open(path.clone()).await {
            Ok(store) => (store, None),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not load status store, starting empty");
                (Self::with_state(StoreState::default(), Some(path)), Some(err))
            }
        }
    }

    /// Replace the clock used for `created_at` / `updated_at`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn with_state(mut state: StoreState, path: Option<PathBuf>) -> Self {
        state.repair_counter();
        Self {
            state: RwLock::new(state),
            path,
            clock: Arc::new(SystemClock),
        }
    }

    /// Serialize `state` and replace the backing file.
    /// Callers hold the write lock.
    async fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = tmp_path(path);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(())
    }
}

#[async_trait]
impl StatusStore for JsonFileStore {
    async fn create_task(&self, links: &[String]) -> Result<TaskId, StoreError> {
        let mut state = self.state.write().await;

        let task_id = state.next_id;
        state.next_id = task_id.next();
        let task = Task::new(task_id, links.iter().cloned(), self.clock.now());
        state.tasks.insert(task_id, task);

        // メモリ上は既に更新済み。書き込み失敗はそのまま呼び出し元へ
        self.persist(&state).await?;
        debug!(%task_id, links = links.len(), "task created");
        Ok(task_id)
    }

    async fn update_status(
        &self,
        task_id: TaskId,
        link: &str,
        status: LinkStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let now = self.clock.now();

        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(StoreError::NotFound(task_id))?;
        let previous = task.set_status(link, status, now);

        match previous {
            Some(prev) if prev != status && !prev.can_transition_to(status) => {
                warn!(%task_id, link, from = %prev, to = %status, "non-monotone status write");
            }
            None => warn!(%task_id, link, "status written for a link the task did not contain"),
            _ => {}
        }

        self.persist(&state).await
    }

    async fn get_tasks(&self, ids: &[TaskId]) -> Vec<Task> {
        let state = self.state.read().await;
        ids.iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect()
    }

    async fn pending_task_ids(&self) -> Vec<TaskId> {
        let state = self.state.read().await;
        state
            .tasks
            .values()
            .filter(|task| !task.is_complete())
            .map(|task| task.id)
            .collect()
    }

    async fn flush(&self) -> Result<(), StoreError> {
        // write lock: two persists must never share the temp file
        let state = self.state.write().await;
        self.persist(&state).await
    }
}

async fn load(path: &Path) -> Result<StoreState, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store file yet, starting empty");
            return Ok(StoreState::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
