//! Ports - 抽象化レイヤー
//!
//! Seams between the worker pool and the outside world:
//! - **StatusStore**: persisted task records
//! - **LinkProbe**: outbound reachability check
//! - **Clock**: timestamps

pub mod clock;
pub mod link_probe;
pub mod status_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::link_probe::LinkProbe;
pub use self::status_store::StatusStore;
