//! In-memory sink

use crate::core::{LogMessage, Result, Sink};
use parking_lot::Mutex;

/// Keeps every message it receives
///
/// Each stored message is the view handed to this sink, so
/// [`LogMessage::sender`] reports the logger the sink was attached to.
pub struct MemorySink {
    name: String,
    messages: Mutex<Vec<LogMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Copy of everything received so far, in arrival order
    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages.lock().clone()
    }

    /// Rendered payloads, in arrival order
    pub fn payloads(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .map(|message| message.payload().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<LogMessage> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn emit(&self, message: &LogMessage) -> Result<()> {
        self.messages.lock().push(message.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
