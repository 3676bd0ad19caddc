//! Job System Configuration

use std::thread;

/// Default worker thread name prefix
pub const DEFAULT_THREAD_NAME: &str = "rundee-worker";

/// Number of parallel execution units reported by the platform, or 1
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Number of worker threads to start
    pub worker_count: usize,

    /// Worker thread name prefix; threads are named `{prefix}-{index}`
    pub thread_name: String,
}

impl JobConfig {
    /// Create with an explicit worker count
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    /// Set worker count
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set thread name prefix
    pub fn with_thread_name(mut self, prefix: &str) -> Self {
        self.thread_name = prefix.to_string();
        self
    }

    pub(crate) fn worker_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name, index)
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            worker_count: available_workers(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}
