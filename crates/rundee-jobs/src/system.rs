//! Job System
//!
//! Lifecycle handle around at most one [`WorkerPool`].
//!
//! The lenient operations ([`initialize`](JobSystem::initialize),
//! [`dispatch`](JobSystem::dispatch), [`shutdown`](JobSystem::shutdown))
//! never fail: misuse is reported through the [`LogSink`] and otherwise
//! tolerated. The `try_*` variants return a [`JobError`] instead.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::JobConfig;
use crate::error::JobError;
use crate::log::{LogSink, TracingSink};
use crate::pool::WorkerPool;

static GLOBAL: OnceLock<JobSystem> = OnceLock::new();

/// Owner of the current worker pool
pub struct JobSystem {
    slot: RwLock<Option<WorkerPool>>,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for JobSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSystem")
            .field("pool", &*self.slot.read())
            .finish()
    }
}

impl Default for JobSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl JobSystem {
    /// Create an uninitialized job system logging through `tracing`
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Create an uninitialized job system with a custom sink
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self {
            slot: RwLock::new(None),
            sink,
        }
    }

    /// Process-wide instance for call sites that cannot be handed a
    /// `JobSystem`
    ///
    /// Statics are never dropped, so call [`shutdown`](Self::shutdown) before
    /// the process exits to drain outstanding jobs.
    pub fn global() -> &'static JobSystem {
        GLOBAL.get_or_init(JobSystem::new)
    }

    /// Start a pool with one worker per available hardware thread
    pub fn initialize_default(&self) {
        self.initialize_with(JobConfig::default());
    }

    /// Start a pool with `worker_count` workers
    pub fn initialize(&self, worker_count: usize) {
        self.initialize_with(JobConfig::new(worker_count));
    }

    /// Start a pool from a configuration
    ///
    /// If a pool is already running it is left untouched and a warning is
    /// logged.
    pub fn initialize_with(&self, config: JobConfig) {
        match self.try_initialize_with(config) {
            Ok(()) => {}
            Err(JobError::AlreadyInitialized) => {
                self.sink.warning("JobSystem already initialized.");
            }
            Err(e) => self.sink.error(&e.to_string()),
        }
    }

    /// Strict form of [`initialize`](Self::initialize)
    pub fn try_initialize(&self, worker_count: usize) -> Result<(), JobError> {
        self.try_initialize_with(JobConfig::new(worker_count))
    }

    /// Strict form of [`initialize_with`](Self::initialize_with)
    ///
    /// Returns [`JobError::NoWorkers`] when workers were requested but none
    /// could be spawned. The pool is installed anyway so a later
    /// [`shutdown`](Self::shutdown) behaves normally.
    pub fn try_initialize_with(&self, config: JobConfig) -> Result<(), JobError> {
        let live = {
            let mut slot = self.slot.write();
            if slot.is_some() {
                return Err(JobError::AlreadyInitialized);
            }

            let pool = WorkerPool::with_config(&config, Arc::clone(&self.sink));
            let live = pool.worker_count();
            *slot = Some(pool);
            live
        };

        self.sink.info(&format!("JobSystem initialized with {live} threads."));

        if live == 0 && config.worker_count > 0 {
            return Err(JobError::NoWorkers {
                requested: config.worker_count,
            });
        }
        Ok(())
    }

    /// Submit a job to the pool
    ///
    /// Without a pool the job is dropped and an error is logged.
    pub fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.try_dispatch(job).is_err() {
            self.sink.error("Cannot dispatch job: JobSystem is not initialized.");
        }
    }

    /// Strict form of [`dispatch`](Self::dispatch)
    pub fn try_dispatch<F>(&self, job: F) -> Result<(), JobError>
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = self.slot.read();
        let pool = slot.as_ref().ok_or(JobError::NotInitialized)?;
        pool.enqueue(job);
        tracing::trace!(pending = pool.pending_jobs(), "Dispatched job to worker pool");
        Ok(())
    }

    /// Drain and stop the pool, blocking until every worker has exited
    ///
    /// Without a pool a warning is logged.
    pub fn shutdown(&self) {
        if let Err(JobError::NotInitialized) = self.try_shutdown() {
            self.sink.warning("JobSystem::shutdown() called before initialization.");
        }
    }

    /// Strict form of [`shutdown`](Self::shutdown)
    pub fn try_shutdown(&self) -> Result<(), JobError> {
        // Release the slot before joining so dispatchers are never blocked
        // behind the drain.
        let mut pool = self.slot.write().take().ok_or(JobError::NotInitialized)?;
        pool.shutdown();

        self.sink.info("JobSystem shutdown completed.");
        Ok(())
    }

    /// Check if a pool is running
    pub fn is_initialized(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Live workers in the current pool, or 0
    pub fn worker_count(&self) -> usize {
        self.slot.read().as_ref().map_or(0, WorkerPool::worker_count)
    }

    /// Jobs waiting in the current pool's queue, or 0
    pub fn pending_jobs(&self) -> usize {
        self.slot.read().as_ref().map_or(0, WorkerPool::pending_jobs)
    }
}
