//! Rundee Jobs
//!
//! Asynchronous job dispatch for Rundee Engine: a fixed-size pool of worker
//! threads fed by one shared queue, and a [`JobSystem`] handle that owns the
//! pool's lifecycle.
//!
//! Jobs are fire-and-forget closures. There are no priorities, dependencies or
//! result futures; a job that needs to report back captures its own channel or
//! synchronized sink.
//!
//! # Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use rundee_jobs::JobSystem;
//!
//! let jobs = JobSystem::new();
//! jobs.initialize(4);
//!
//! let results = Arc::new(Mutex::new(Vec::new()));
//! for i in 0..8 {
//!     let results = Arc::clone(&results);
//!     jobs.dispatch(move || results.lock().unwrap().push(i));
//! }
//!
//! // Blocks until every dispatched job has run
//! jobs.shutdown();
//! assert_eq!(results.lock().unwrap().len(), 8);
//! ```

pub mod config;
mod error;
mod job;
pub mod log;
mod pool;
mod system;

pub use config::{JobConfig, available_workers};
pub use error::JobError;
pub use job::Job;
pub use log::{LogLevel, LogSink, TracingSink};
pub use pool::WorkerPool;
pub use system::JobSystem;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
