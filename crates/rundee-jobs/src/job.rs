//! Jobs
//!
//! A job is any boxed `FnOnce` closure. Running one goes through
//! [`run_job`], which turns a panic in the job body into an error message
//! instead of unwinding into the worker loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Opaque unit of work: no arguments, no result
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Run a job to completion, catching any panic it raises
///
/// The process panic hook still runs before the panic is caught. With the
/// default hook that means a failing job also prints a `panicked at` line to
/// stderr; binaries that want a single report install their own hook.
pub(crate) fn run_job(job: Job) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(job)).map_err(|payload| panic_message(payload.as_ref()))
}

/// Extract the text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
