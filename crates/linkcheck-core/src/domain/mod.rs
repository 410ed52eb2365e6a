//! Domain model (ids, link status, task records, batches).

pub mod batch;
pub mod ids;
pub mod state;
pub mod task;

pub use batch::{LinkBatch, dedup_links};
pub use ids::TaskId;
pub use state::{Availability, LinkStatus};
pub use task::Task;
