//! Logging macros for ergonomic message formatting.
//!
//! Each macro formats its arguments like `format!` and logs the resulting
//! `String`, returning the `Result` of [`Logger::log`](crate::Logger::log).
//!
//! # Examples
//!
//! ```
//! use rust_logger_tree::prelude::*;
//! use rust_logger_tree::info;
//!
//! let logger = Logger::new("server").unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! ```

/// Log a formatted message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_logger_tree::prelude::*;
/// # let logger = Logger::new("app").unwrap();
/// use rust_logger_tree::log;
/// log!(logger, LogLevel::INFO, "Simple message").unwrap();
/// log!(logger, LogLevel::ERROR, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_tree::prelude::*;
/// # let logger = Logger::new("app").unwrap();
/// use rust_logger_tree::info;
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARNING, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_tree::prelude::*;
/// # let logger = Logger::new("app").unwrap();
/// use rust_logger_tree::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full").unwrap();
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::FATAL, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, SinkHandle};
    use crate::sinks::MemorySink;
    use std::sync::Arc;

    fn recorded_logger() -> (Logger, Arc<MemorySink>) {
        let memory = Arc::new(MemorySink::new());
        let logger = Logger::builder("macros")
            .min_level(LogLevel::DEBUG)
            .sink_handle(SinkHandle::from(Arc::clone(&memory)))
            .build()
            .unwrap();
        (logger, memory)
    }

    #[test]
    fn test_level_macros() {
        let (logger, memory) = recorded_logger();

        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warning!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();
        fatal!(logger, "Critical failure: {}", "system").unwrap();
        logger.flush().unwrap();

        let levels: Vec<_> = memory.messages().iter().map(|m| m.level()).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::DEBUG,
                LogLevel::INFO,
                LogLevel::WARNING,
                LogLevel::ERROR,
                LogLevel::FATAL
            ]
        );
        assert_eq!(memory.payloads()[2], "Retry 1 of 3");
    }

    #[test]
    fn test_log_macro_after_dispose() {
        let (logger, _memory) = recorded_logger();
        logger.dispose().unwrap();
        assert!(log!(logger, LogLevel::INFO, "late {}", 1).is_err());
    }
}
