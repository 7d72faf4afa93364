//! # Rust Logger Tree
//!
//! A hierarchical, asynchronous logging pipeline.
//!
//! Loggers form a tree by name. Each logger owns a queue and one worker
//! thread; the worker filters every message, forwards accepted messages to
//! the parent logger and fans them out to its own sinks concurrently. One
//! call to [`Logger::info`] therefore reaches the sinks of every ancestor
//! that does not filter it out.
//!
//! ## Features
//!
//! - **Hierarchy**: child loggers inherit their parent's minimum level and
//!   forward to it
//! - **Non-blocking**: `log` only enqueues; `flush` and `dispose` drain
//! - **Pluggable sinks and filters**: swapped in and out while messages flow
//! - **Fault isolation**: a failing or panicking sink never stops a worker
//!
//! ```
//! use rust_logger_tree::prelude::*;
//! use std::sync::Arc;
//!
//! let app = Logger::new("app")?;
//! let db = app.child("app.db")?;
//!
//! let recorded = Arc::new(MemorySink::new());
//! app.attach_sink(SinkHandle::from(Arc::clone(&recorded)));
//!
//! db.debug("connecting")?;
//! db.info("connected")?;
//! db.flush()?;
//! app.flush()?;
//!
//! assert_eq!(recorded.payloads(), vec!["connected"]);
//! assert_eq!(recorded.messages()[0].trail(), vec!["app.db", "app"]);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Filter, LogLevel, LogMessage, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, OutputFormat, Payload, Result, Sink, SinkErrorCallback, SinkHandle,
        TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::MemorySink;
}

pub use core::{
    Filter, LogLevel, LogMessage, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    OutputFormat, Payload, Result, Sink, SinkErrorCallback, SinkHandle, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
pub use sinks::MemorySink;
