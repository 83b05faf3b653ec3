//! Service configuration.
//!
//! # File Format
//!
//! Every field is optional; missing fields take their defaults:
//!
//! ```json
//! {
//!   "shell": "/bin/bash",
//!   "defaultTimeoutMs": 30000,
//!   "approvalWarningMs": 5000,
//!   "eventCapacity": 1024
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_APPROVAL_WARNING_MS: u64 = 5_000;
const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Configuration for a [`CommandService`](crate::service::CommandService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    /// Shell executable. `None` uses the platform default.
    pub shell: Option<String>,
    /// Execution deadline applied when a call does not override it.
    pub default_timeout_ms: u64,
    /// How long a command may sit pending before an `approval_timeout`
    /// advisory event is published.
    pub approval_warning_ms: u64,
    /// Number of events buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            shell: None,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            approval_warning_ms: DEFAULT_APPROVAL_WARNING_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Set the shell executable.
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Set the default execution timeout.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the advisory approval warning delay.
    pub fn approval_warning(mut self, after: Duration) -> Self {
        self.approval_warning_ms = after.as_millis() as u64;
        self
    }

    /// Set the event bus capacity.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn default_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn approval_warning_duration(&self) -> Duration {
        Duration::from_millis(self.approval_warning_ms)
    }
}
