//! Error types for command policy and execution.

use std::time::Duration;
use thiserror::Error;

/// Failure of a command request, an approval decision or an execution.
///
/// Cloneable so that a single execution failure can be handed to both the
/// caller of `approve_command` and any waiter blocked on the same request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not whitelisted: {0}")]
    NotWhitelisted(String),

    #[error("Command is forbidden: {0}")]
    Forbidden(String),

    /// The command was queued for approval and the operator denied it.
    #[error("Command was not approved: {reason}")]
    Denied { reason: String },

    #[error("No pending command with ID: {0}")]
    NotFound(String),

    #[error("Command execution failed: timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Failed to spawn shell: {0}")]
    SpawnFailure(String),

    #[error("Failed to read command output: {0}")]
    Io(String),

    #[error("Invalid command line: {0}")]
    InvalidCommandLine(String),

    /// The pending record went away without a decision (service dropped).
    #[error("Approval for command {0} was abandoned")]
    ApprovalAbandoned(String),
}

/// Failure loading a [`ServiceConfig`](crate::config::ServiceConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
