//! Filter predicates evaluated by a logger before forwarding and fan-out

use super::{log_level::LogLevel, log_message::LogMessage};
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&LogMessage) -> bool + Send + Sync;

/// A predicate over [`LogMessage`].
///
/// Filters compare by identity: a clone of a filter removes the filter it
/// was cloned from, while two filters built from identical closures are
/// distinct.
///
/// # Example
///
/// ```
/// use rust_logger_tree::{Filter, LogLevel, LogMessage};
///
/// let no_secrets = Filter::new(|m: &LogMessage| !m.payload().to_string().contains("password"));
/// assert!(no_secrets.accepts(&LogMessage::new(LogLevel::INFO, "login ok")));
/// assert!(!no_secrets.accepts(&LogMessage::new(LogLevel::INFO, "password=hunter2")));
/// ```
#[derive(Clone)]
pub struct Filter {
    predicate: Arc<Predicate>,
}

impl Filter {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&LogMessage) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Accept messages at or above `level`.
    pub fn min_level(level: LogLevel) -> Self {
        Self::new(move |message| message.level() >= level)
    }

    /// Accept messages at or below `level`.
    pub fn max_level(level: LogLevel) -> Self {
        Self::new(move |message| message.level() <= level)
    }

    /// Accept messages that passed through the logger called `name`.
    pub fn from_sender(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |message| message.trail().iter().any(|sender| *sender == name))
    }

    #[inline]
    pub fn accepts(&self, message: &LogMessage) -> bool {
        (self.predicate)(message)
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.predicate), Arc::as_ptr(&other.predicate))
    }
}

impl Eq for Filter {}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("predicate", &Arc::as_ptr(&self.predicate))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        let at_least_warning = Filter::min_level(LogLevel::WARNING);
        assert!(!at_least_warning.accepts(&LogMessage::new(LogLevel::INFO, "x")));
        assert!(at_least_warning.accepts(&LogMessage::new(LogLevel::WARNING, "x")));

        let at_most_info = Filter::max_level(LogLevel::INFO);
        assert!(at_most_info.accepts(&LogMessage::new(LogLevel::DEBUG, "x")));
        assert!(!at_most_info.accepts(&LogMessage::new(LogLevel::ERROR, "x")));
    }

    #[test]
    fn test_from_sender() {
        let only_db = Filter::from_sender("app.db");
        let mut message = LogMessage::new(LogLevel::INFO, "query");
        assert!(!only_db.accepts(&message));

        message.push_sender("app.db");
        message.push_sender("app");
        assert!(only_db.accepts(&message));
    }

    #[test]
    fn test_identity() {
        let a = Filter::new(|_| true);
        let b = Filter::new(|_| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
