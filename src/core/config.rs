//! Declarative logger trees
//!
//! ```
//! use rust_logger_tree::{LoggerConfig, LogLevel};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "name": "app",
//!     "min_level": "warning",
//!     "children": [
//!         { "name": "app.db", "min_level": "debug" },
//!         { "name": "app.http" }
//!     ]
//! }"#).unwrap();
//!
//! let loggers = config.build().unwrap();
//! assert_eq!(loggers.len(), 3);
//! assert_eq!(loggers[1].min_level(), LogLevel::DEBUG);
//! assert_eq!(loggers[2].min_level(), LogLevel::WARNING);
//! ```

use super::{error::Result, log_level::LogLevel, logger::Logger};
use serde::{Deserialize, Serialize};

/// One node of a logger tree and its descendants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,

    /// Level override by name; inherited from the parent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LoggerConfig>,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: LoggerConfig) -> Self {
        self.children.push(child);
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Create the described tree as a new root. Loggers are returned in
    /// pre-order, so the root comes first.
    pub fn build(&self) -> Result<Vec<Logger>> {
        self.build_under(None)
    }

    /// Create the described tree below `parent`, or as a root when `None`.
    pub fn build_under(&self, parent: Option<&Logger>) -> Result<Vec<Logger>> {
        let mut created = Vec::new();
        self.build_into(parent, &mut created)?;
        Ok(created)
    }

    fn build_into(&self, parent: Option<&Logger>, created: &mut Vec<Logger>) -> Result<()> {
        let mut builder = Logger::builder(self.name.as_str());
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        if let Some(level) = self.min_level {
            builder = builder.min_level(level);
        }

        let logger = builder.build()?;
        created.push(logger.clone());

        for child in &self.children {
            child.build_into(Some(&logger), created)?;
        }
        Ok(())
    }
}
