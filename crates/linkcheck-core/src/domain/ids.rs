//! Task identifiers.
//!
//! The status store hands out ids sequentially (1, 2, 3, ...) and never reuses
//! them. The newtype keeps them from being mixed up with counts or indexes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of one submitted batch of links.
///
/// Serialized as a bare number so the persisted file stays readable
/// (`{"tasks": {"1": {...}}, "next_id": 2}`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// First id issued by an empty store.
    pub const FIRST: TaskId = TaskId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id allocated right after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Accepts both `42` and `task-42`.
impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix("task-").unwrap_or(digits);
        digits.parse::<u64>().map(TaskId)
    }
}
