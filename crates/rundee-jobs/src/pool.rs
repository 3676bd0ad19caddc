//! Worker Pool
//!
//! Fixed-size pool of OS threads sharing one unbounded job queue.
//!
//! The queue is a multi-producer multi-consumer channel. Every worker blocks
//! on `recv`; an enqueue wakes one of them. Shutdown drops the only sender,
//! which wakes every idle worker. Each worker keeps receiving until the
//! channel is both closed and empty, so jobs queued before shutdown still run.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::config::JobConfig;
use crate::job::{Job, run_job};
use crate::log::LogSink;

/// State shared between the pool handle and its workers
struct PoolShared {
    sink: Arc<dyn LogSink>,
    /// Jobs currently running
    active: AtomicUsize,
    /// Jobs that returned normally
    completed: AtomicUsize,
    /// Jobs that panicked
    failed: AtomicUsize,
}

struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl Worker {
    fn spawn(
        id: usize,
        name: String,
        receiver: Receiver<Job>,
        shared: Arc<PoolShared>,
    ) -> io::Result<Self> {
        // `Builder::name` panics on interior NUL bytes instead of failing
        if name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("thread name {name:?} contains a NUL byte"),
            ));
        }

        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || worker_loop(id, receiver, shared))?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>, shared: Arc<PoolShared>) {
    // Err means the sender is gone and nothing is left to drain
    while let Ok(job) = receiver.recv() {
        shared.active.fetch_add(1, Ordering::SeqCst);
        let outcome = run_job(job);
        shared.active.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Ok(()) => {
                shared.completed.fetch_add(1, Ordering::SeqCst);
            }
            Err(message) => {
                shared.failed.fetch_add(1, Ordering::SeqCst);
                shared.sink.error(&format!(
                    "Panic during job execution on worker {id}: {message}"
                ));
            }
        }
    }

    shared.sink.info(&format!("Worker {id} terminating."));
}

/// Fixed-size pool of worker threads
pub struct WorkerPool {
    /// Workers that were started successfully
    workers: Vec<Worker>,
    /// Queue producer; `None` once the pool has been shut down
    sender: Option<Sender<Job>>,
    /// Keeps the queue connected even when no worker started
    _receiver: Receiver<Job>,
    /// Worker count that was asked for
    requested: usize,
    shared: Arc<PoolShared>,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("requested", &self.requested)
            .field("pending_jobs", &self.pending_jobs())
            .field("active_jobs", &self.active_jobs())
            .field("stopping", &self.is_stopping())
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `worker_count` threads and default thread names
    pub fn new(worker_count: usize, sink: Arc<dyn LogSink>) -> Self {
        Self::with_config(&JobConfig::new(worker_count), sink)
    }

    /// Create a pool from a configuration
    ///
    /// Threads that fail to spawn are reported through the sink and the pool
    /// keeps running with the workers that did start.
    pub fn with_config(config: &JobConfig, sink: Arc<dyn LogSink>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let shared = Arc::new(PoolShared {
            sink,
            active: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(config.worker_count);
        for id in 0..config.worker_count {
            match Worker::spawn(
                id,
                config.worker_name(id),
                receiver.clone(),
                Arc::clone(&shared),
            ) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    let message = format!("WorkerPool failed to start worker {id}: {e}");
                    shared.sink.error(&message);
                }
            }
        }

        if config.worker_count == 0 {
            shared.sink.warning("WorkerPool created with 0 threads; queued jobs will never run.");
        } else {
            shared.sink.info(&format!("WorkerPool created with {} threads.", workers.len()));
        }

        Self {
            workers,
            sender: Some(sender),
            _receiver: receiver,
            requested: config.worker_count,
            shared,
        }
    }

    /// Queue a job for execution by the next idle worker
    ///
    /// Never blocks. A job enqueued after [`shutdown`](Self::shutdown) is
    /// dropped and reported as an error.
    pub fn enqueue<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue_boxed(Box::new(job));
    }

    /// Queue an already boxed job
    pub fn enqueue_boxed(&self, job: Job) {
        let Some(sender) = &self.sender else {
            self.shared.sink.error("Cannot enqueue job: WorkerPool has been shut down.");
            return;
        };

        if sender.send(job).is_err() {
            self.shared.sink.error("Cannot enqueue job: WorkerPool queue is disconnected.");
        }
    }

    /// Number of workers that were started
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of workers that were asked for
    pub fn requested_workers(&self) -> usize {
        self.requested
    }

    /// Jobs waiting in the queue
    pub fn pending_jobs(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Jobs currently running
    pub fn active_jobs(&self) -> usize {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Jobs that ran to completion
    pub fn completed_jobs(&self) -> usize {
        self.shared.completed.load(Ordering::SeqCst)
    }

    /// Jobs that panicked
    pub fn failed_jobs(&self) -> usize {
        self.shared.failed.load(Ordering::SeqCst)
    }

    /// Check if nothing is queued or running
    pub fn is_idle(&self) -> bool {
        self.pending_jobs() == 0 && self.active_jobs() == 0
    }

    /// Check if shutdown has begun
    pub fn is_stopping(&self) -> bool {
        self.sender.is_none()
    }

    /// Stop accepting jobs, drain the queue and join every worker
    ///
    /// Blocks until all workers have exited. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };

        // Without workers nobody drains the queue
        let discarded = if self.workers.is_empty() { sender.len() } else { 0 };
        drop(sender);

        let current = thread::current().id();
        let mut joined = 0;
        for worker in &mut self.workers {
            let Some(thread) = worker.thread.take() else {
                continue;
            };

            if thread.thread().id() == current {
                self.shared.sink.warning(&format!(
                    "WorkerPool shut down from its own worker {}; not joining it.",
                    worker.id
                ));
                continue;
            }

            if thread.join().is_err() {
                let message = format!("Worker {} exited abnormally.", worker.id);
                self.shared.sink.error(&message);
            }
            joined += 1;
        }

        if discarded > 0 {
            self.shared.sink.warning(&format!(
                "WorkerPool discarded {discarded} queued jobs with no workers to run them."
            ));
        }

        if joined == self.workers.len() {
            self.shared.sink.info("WorkerPool destroyed and all threads joined.");
        } else {
            self.shared.sink.info(&format!(
                "WorkerPool destroyed with {joined} of {} threads joined.",
                self.workers.len()
            ));
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
