//! Async sinks driven from logger worker threads
//!
//! Logger workers are plain threads. [`BlockingSink`] lets an [`AsyncSink`]
//! take part in a fan-out by running it to completion on a tokio runtime.

use super::{error::Result, log_message::LogMessage, sink::Sink};
use async_trait::async_trait;
use tokio::runtime::Handle;

/// Trait for asynchronous sinks
///
/// # Example
///
/// ```no_run
/// use rust_logger_tree::core::{AsyncSink, BlockingSink, LogMessage, Result};
/// use rust_logger_tree::Logger;
/// use async_trait::async_trait;
///
/// struct Webhook;
///
/// #[async_trait]
/// impl AsyncSink for Webhook {
///     async fn emit(&self, message: &LogMessage) -> Result<()> {
///         // post the message somewhere
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "webhook"
///     }
/// }
///
/// # async fn run() {
/// let logger = Logger::new("app").unwrap();
/// logger.add_sink(BlockingSink::current(Webhook));
/// # }
/// ```
#[async_trait]
pub trait AsyncSink: Send + Sync {
    async fn emit(&self, message: &LogMessage) -> Result<()>;

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Adapter running an [`AsyncSink`] on a tokio runtime
pub struct BlockingSink<S> {
    inner: S,
    runtime: Handle,
}

impl<S: AsyncSink> BlockingSink<S> {
    pub fn new(inner: S, runtime: Handle) -> Self {
        Self { inner, runtime }
    }

    /// Bind to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current(inner: S) -> Self {
        Self::new(inner, Handle::current())
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: AsyncSink> Sink for BlockingSink<S> {
    fn emit(&self, message: &LogMessage) -> Result<()> {
        self.runtime.block_on(self.inner.emit(message))
    }

    fn flush(&self) -> Result<()> {
        self.runtime.block_on(self.inner.flush())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
