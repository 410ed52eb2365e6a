//! linkcheck-core
//!
//! Core building blocks for the link checker.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, link status, task, batch）
//! - **ports**: 抽象化レイヤー（StatusStore, LinkProbe, Clock）
//! - **impls**: 実装（JsonFileStore, WorkQueue, HttpProbe）
//! - **app**: アプリケーションロジック（LinkChecker, WorkerPool, LinkCounts）
//! - **config**: CheckerConfig と環境変数
//! - **error**: エラー型

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

#[cfg(test)]
mod testing;

pub use app::{LinkChecker, LinkCounts};
pub use config::CheckerConfig;
pub use domain::{Availability, LinkStatus, Task, TaskId};
pub use error::{ConfigError, LinkCheckError, StoreError};
