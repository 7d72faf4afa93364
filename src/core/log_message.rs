//! Log message structure
//!
//! A [`LogMessage`] is created once per logging call. Clones share the same
//! underlying record, so the message forwarded to a parent logger is the
//! message the child received, trail included.

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Anything an application can log.
///
/// Implemented for every `'static` type that is `Debug + Display + Send + Sync`,
/// so strings, numbers and `serde_json::Value` all work out of the box.
pub trait Payload: Any + fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + fmt::Display + Send + Sync> Payload for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Record {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    payload: Box<dyn Payload>,
    thread_id: String,
    thread_name: Option<String>,
    trail: Mutex<Vec<Arc<str>>>,
}

/// One log event travelling up the logger tree.
///
/// The trail of sender names is shared by all clones and only grows, except
/// that a logger whose queue refuses the message takes its own name back.
/// Each clone remembers where its own last push landed, which is what
/// [`sender`](LogMessage::sender) reports: a sink attached to `app.db` sees
/// `"app.db"` even if the parent `app` has already pushed its name.
#[derive(Clone)]
pub struct LogMessage {
    record: Arc<Record>,
    position: Option<usize>,
}

impl LogMessage {
    pub fn new<P: Payload>(level: LogLevel, payload: P) -> Self {
        Self {
            record: Arc::new(Record {
                timestamp: Utc::now(),
                level,
                payload: Box::new(payload),
                thread_id: get_thread_id(),
                thread_name: get_thread_name(),
                trail: Mutex::new(Vec::new()),
            }),
            position: None,
        }
    }

    /// Append `name` to the shared trail and make it this view's sender.
    pub fn push_sender(&mut self, name: impl Into<Arc<str>>) {
        let mut trail = self.record.trail.lock();
        trail.push(name.into());
        self.position = Some(trail.len() - 1);
    }

    pub(crate) fn position(&self) -> Option<usize> {
        self.position
    }

    /// Take back this view's last push when no later push was made, and
    /// point the view at `previous` again.
    pub(crate) fn retract_sender(&mut self, previous: Option<usize>) {
        let mut trail = self.record.trail.lock();
        if self.position.is_some_and(|idx| idx + 1 == trail.len()) {
            trail.pop();
            self.position = previous;
        }
    }

    /// Name of the logger that handed over this view, or `""` if none yet.
    pub fn sender(&self) -> String {
        match self.position {
            Some(idx) => self.record.trail.lock()[idx].to_string(),
            None => String::new(),
        }
    }

    /// Snapshot of every name pushed so far, oldest first.
    pub fn trail(&self) -> Vec<String> {
        self.record
            .trail
            .lock()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn level(&self) -> LogLevel {
        self.record.level
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.record.timestamp
    }

    pub fn payload(&self) -> &dyn Payload {
        &*self.record.payload
    }

    /// Downcast the payload to a concrete type
    ///
    /// ```
    /// use rust_logger_tree::{LogLevel, LogMessage};
    ///
    /// let message = LogMessage::new(LogLevel::INFO, 42u32);
    /// assert_eq!(message.payload_as::<u32>(), Some(&42));
    /// assert!(message.payload_as::<String>().is_none());
    /// ```
    pub fn payload_as<T: Any>(&self) -> Option<&T> {
        self.payload().as_any().downcast_ref::<T>()
    }

    pub fn thread_id(&self) -> &str {
        &self.record.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.record.thread_name.as_deref()
    }

    /// Whether both views share one underlying record.
    pub fn same_record(&self, other: &LogMessage) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }
}

impl fmt::Debug for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogMessage")
            .field("timestamp", &self.record.timestamp)
            .field("level", &self.record.level)
            .field("payload", &self.record.payload)
            .field("sender", &self.sender())
            .field("trail", &self.trail())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_empty_trail() {
        let message = LogMessage::new(LogLevel::INFO, "hello");
        assert_eq!(message.sender(), "");
        assert!(message.trail().is_empty());
        assert_eq!(message.level(), LogLevel::INFO);
        assert_eq!(message.payload().to_string(), "hello");
    }

    #[test]
    fn test_push_sender_moves_current_sender() {
        let mut message = LogMessage::new(LogLevel::WARNING, "disk low");
        message.push_sender("app.db");
        assert_eq!(message.sender(), "app.db");

        message.push_sender("app");
        assert_eq!(message.sender(), "app");
        assert_eq!(message.trail(), vec!["app.db", "app"]);
    }

    #[test]
    fn test_clones_share_trail_but_keep_their_sender() {
        let mut child_view = LogMessage::new(LogLevel::INFO, "connected");
        child_view.push_sender("app.db");

        let mut parent_view = child_view.clone();
        parent_view.push_sender("app");

        assert!(child_view.same_record(&parent_view));
        assert_eq!(child_view.sender(), "app.db");
        assert_eq!(parent_view.sender(), "app");
        assert_eq!(child_view.trail(), vec!["app.db", "app"]);
    }

    #[test]
    fn test_retract_only_undoes_the_latest_push() {
        let mut message = LogMessage::new(LogLevel::INFO, "queued");
        message.push_sender("app.db");
        let before = message.position();

        message.push_sender("app");
        message.retract_sender(before);
        assert_eq!(message.trail(), vec!["app.db"]);
        assert_eq!(message.sender(), "app.db");

        // A later push by another view pins the earlier entry
        let mut parent_view = message.clone();
        parent_view.push_sender("root");
        message.retract_sender(None);
        assert_eq!(message.trail(), vec!["app.db", "root"]);
    }

    #[test]
    fn test_payload_downcast() {
        let message = LogMessage::new(LogLevel::DEBUG, String::from("owned"));
        assert_eq!(message.payload_as::<String>().map(String::as_str), Some("owned"));
        assert!(message.payload_as::<&str>().is_none());

        let value = serde_json::json!({"user": 7});
        let message = LogMessage::new(LogLevel::INFO, value.clone());
        assert_eq!(message.payload_as::<serde_json::Value>(), Some(&value));
    }

    #[test]
    fn test_thread_info_captured() {
        let message = std::thread::Builder::new()
            .name("capture-thread".into())
            .spawn(|| LogMessage::new(LogLevel::INFO, "x"))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(message.thread_name(), Some("capture-thread"));
        assert!(message.thread_id().starts_with("ThreadId"));
    }
}
