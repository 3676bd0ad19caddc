//! Logging Sink
//!
//! The job system reports lifecycle events and misuse through a [`LogSink`]
//! instead of returning errors. [`TracingSink`] is the default and forwards to
//! `tracing`; tests and embedders can plug in their own sink.

use std::fmt;

/// Severity of a job system message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Lifecycle information
    Info = 0,
    /// Tolerated misuse (double init, shutdown without init)
    Warning = 1,
    /// Dropped jobs, failed jobs, spawn failures
    Error = 2,
}

impl LogLevel {
    /// Get level name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination for job system messages
pub trait LogSink: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Sink that forwards to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "rundee_jobs", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "rundee_jobs", "{}", message),
            LogLevel::Error => tracing::error!(target: "rundee_jobs", "{}", message),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_provided_methods() {
        let sink = RecordingSink::default();
        sink.info("a");
        sink.warning("b");
        sink.error("c");

        assert_eq!(
            sink.entries(),
            vec![
                (LogLevel::Info, "a".to_string()),
                (LogLevel::Warning, "b".to_string()),
                (LogLevel::Error, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: events are discarded
        TracingSink.log(LogLevel::Error, "nobody listening");
    }
}
