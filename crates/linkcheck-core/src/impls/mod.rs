//! Impls - port implementations and the work queue.
//!
//! # 含まれる実装
//! - **JsonFileStore**: StatusStore backed by one JSON file (or memory only)
//! - **WorkQueue**: bounded FIFO between dispatcher and workers
//! - **HttpProbe**: LinkProbe using a reqwest HEAD request

pub mod http_probe;
pub mod json_store;
pub mod work_queue;

pub use self::http_probe::{HttpProbe, classify, normalize_link};
pub use self::json_store::JsonFileStore;
pub use self::work_queue::WorkQueue;
