//! Core logger pipeline types and traits

pub mod config;
pub mod error;
pub mod filter;
pub mod log_level;
pub mod log_message;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod sink;
pub mod timestamp;

#[cfg(feature = "async-sinks")]
pub mod async_sink;

mod fan_out;
mod snapshot;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use filter::Filter;
pub use log_level::LogLevel;
pub use log_message::{LogMessage, Payload};
pub use logger::{Logger, LoggerBuilder, SinkErrorCallback, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use sink::{Sink, SinkHandle};
pub use timestamp::TimestampFormat;

#[cfg(feature = "async-sinks")]
pub use async_sink::{AsyncSink, BlockingSink};
