//! Rundee Sandbox - Job System Demo
//!
//! Usage: `rundee-sandbox [WORKERS]`. Set `RUST_LOG` to change verbosity.

use std::panic;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rundee_jobs::{JobConfig, JobSystem};
use tracing_subscriber::EnvFilter;

const DEMO_JOBS: u64 = 64;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();

    // Job panics are already reported at error level by the worker; keep the
    // location detail at debug instead of a second line on stderr.
    panic::set_hook(Box::new(|info| {
        tracing::debug!(target: "panic", "{info}");
    }));

    tracing::info!("Starting Rundee Sandbox v{}...", rundee_jobs::VERSION);

    let config = match std::env::args().nth(1) {
        Some(arg) => {
            let workers = arg
                .parse::<usize>()
                .with_context(|| format!("invalid worker count: {arg}"))?;
            JobConfig::default().with_workers(workers)
        }
        None => JobConfig::default(),
    };

    let jobs = JobSystem::new();
    jobs.try_initialize_with(config)?;

    let sum = Arc::new(AtomicU64::new(0));
    let finished = Arc::new(Mutex::new(Vec::with_capacity(DEMO_JOBS as usize)));
    for i in 0..DEMO_JOBS {
        let sum = Arc::clone(&sum);
        let finished = Arc::clone(&finished);
        jobs.dispatch(move || {
            let square = i * i;
            sum.fetch_add(square, Ordering::Relaxed);
            if let Ok(mut finished) = finished.lock() {
                finished.push(i);
            }
        });
    }

    // Failures stay inside the worker
    jobs.dispatch(|| panic!("sandbox job failed on purpose"));

    tracing::info!(pending = jobs.pending_jobs(), "Dispatched demo jobs");
    jobs.try_shutdown()?;

    let finished = finished
        .lock()
        .map(|f| f.len())
        .map_err(|_| anyhow::anyhow!("result collector poisoned"))?;
    tracing::info!(
        finished,
        sum = sum.load(Ordering::Relaxed),
        "All jobs finished"
    );

    Ok(())
}
