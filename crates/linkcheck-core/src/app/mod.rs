//! App - アプリケーション層
//!
//! ports と impls を組み合わせて link check の流れを作る。
//!
//! # 主要コンポーネント
//! - **LinkChecker**: submit / query / start / stop の入口
//! - **WorkerPool**: queue を drain して link を確認する固定数の worker
//! - **LinkCounts**: task ごとの status 集計

pub mod checker;
pub mod status;
pub mod worker_pool;

pub use self::checker::LinkChecker;
pub use self::status::LinkCounts;
pub use self::worker_pool::{WorkerContext, WorkerPool};
