//! Error types for the logger pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Severity name that matches none of the well-known levels
    #[error("Unrecognized log level: '{text}'")]
    UnknownLevel { text: String },

    /// Operation on a logger that has been disposed
    #[error("Logger '{logger}' has been disposed")]
    Disposed { logger: String },

    /// Queue rejected a message because its worker is gone
    #[error("Worker of logger '{logger}' is no longer receiving messages")]
    WorkerStopped { logger: String },

    /// Worker thread could not be started or panicked
    #[error("Worker of logger '{logger}' failed: {message}")]
    WorkerFailed { logger: String, message: String },

    /// Flush or dispose requested from the worker thread it would wait on
    #[error("Logger '{logger}' cannot {operation} from its own worker thread")]
    ReentrantLifecycle {
        logger: String,
        operation: &'static str,
    },

    /// Sink returned an error from `emit` or `flush`
    #[error("Sink '{sink}' failed: {message}")]
    SinkFailed { sink: String, message: String },

    /// Sink panicked while handling a message
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unrecognized level error carrying the offending text
    pub fn unknown_level(text: impl Into<String>) -> Self {
        LoggerError::UnknownLevel { text: text.into() }
    }

    /// Create a disposed-logger error
    pub fn disposed(logger: impl Into<String>) -> Self {
        LoggerError::Disposed {
            logger: logger.into(),
        }
    }

    pub fn worker_stopped(logger: impl Into<String>) -> Self {
        LoggerError::WorkerStopped {
            logger: logger.into(),
        }
    }

    pub fn worker_failed(logger: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WorkerFailed {
            logger: logger.into(),
            message: message.into(),
        }
    }

    pub fn reentrant(logger: impl Into<String>, operation: &'static str) -> Self {
        LoggerError::ReentrantLifecycle {
            logger: logger.into(),
            operation,
        }
    }

    /// Create a sink failure error
    pub fn sink_failed(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailed {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a sink panic error
    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error was raised by a sink rather than by the pipeline
    pub fn is_sink_fault(&self) -> bool {
        matches!(
            self,
            LoggerError::SinkFailed { .. } | LoggerError::SinkPanicked { .. }
        )
    }
}

/// Render a panic payload caught by `catch_unwind`
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
