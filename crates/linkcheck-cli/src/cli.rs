use std::path::PathBuf;

use clap::{Parser, Subcommand};
use linkcheck_core::{CheckerConfig, TaskId};

#[derive(Parser, Debug)]
#[command(
    name = "linkcheck",
    version,
    about = "Check links for reachability and keep their status in a JSON store"
)]
pub struct Cli {
    /// Status store file (overrides LINKCHECK_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Number of workers (overrides LINKCHECK_WORKERS)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Work queue capacity (overrides LINKCHECK_QUEUE_CAPACITY)
    #[arg(long, global = true)]
    pub queue_capacity: Option<usize>,

    /// Keep the status store in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one batch of links and wait for every result
    ///
    /// Example: linkcheck check example.com http://localhost:1
    Check {
        #[arg(required = true)]
        links: Vec<String>,

        /// Store poll interval while waiting, in milliseconds
        #[arg(long, default_value_t = 200)]
        poll_ms: u64,
    },

    /// Print stored tasks; unknown ids are skipped
    ///
    /// Example: linkcheck report 1 task-2
    Report {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply(&self, config: &mut CheckerConfig) {
        if let Some(path) = &self.data_file {
            config.data_file = path.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
    }
}
