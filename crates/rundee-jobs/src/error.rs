//! Job System Errors

/// Misuse reported by the strict `try_*` operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("JobSystem already initialized")]
    AlreadyInitialized,

    #[error("JobSystem is not initialized")]
    NotInitialized,

    #[error("No worker threads could be started ({requested} requested)")]
    NoWorkers { requested: usize },
}
