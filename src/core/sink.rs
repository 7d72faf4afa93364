//! Sink trait for log output destinations

use super::{error::Result, log_message::LogMessage};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A destination for log messages.
///
/// A logger calls every attached sink concurrently for each accepted
/// message, so `emit` takes `&self`; sinks that keep mutable state guard it
/// themselves. Errors and panics are contained by the logger and never stop
/// its worker.
pub trait Sink: Send + Sync {
    fn emit(&self, message: &LogMessage) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Shared handle to a sink, compared by identity.
///
/// ```
/// use rust_logger_tree::{Logger, SinkHandle};
/// use rust_logger_tree::sinks::MemorySink;
///
/// let logger = Logger::new("app").unwrap();
/// let memory = SinkHandle::new(MemorySink::new());
/// logger.attach_sink(memory.clone());
/// assert!(logger.detach_sink(&memory));
/// ```
#[derive(Clone)]
pub struct SinkHandle {
    sink: Arc<dyn Sink>,
}

impl SinkHandle {
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn from_arc(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl<S: Sink + 'static> From<Arc<S>> for SinkHandle {
    fn from(sink: Arc<S>) -> Self {
        Self { sink }
    }
}

impl Deref for SinkHandle {
    type Target = dyn Sink;

    fn deref(&self) -> &Self::Target {
        self.sink.as_ref()
    }
}

impl PartialEq for SinkHandle {
    fn eq(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units.
        std::ptr::addr_eq(Arc::as_ptr(&self.sink), Arc::as_ptr(&other.sink))
    }
}

impl Eq for SinkHandle {}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkHandle")
            .field("name", &self.sink.name())
            .finish()
    }
}
