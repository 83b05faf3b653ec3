//! Pending command record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A command waiting for an operator to approve or deny it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCommand {
    /// Unique per request, never reused.
    pub id: String,
    pub command: String,
    pub args: Vec<String>,
    pub requested_at: DateTime<Utc>,
    pub requested_by: Option<String>,
}

impl PendingCommand {
    /// Create a record with a fresh ID, stamped now.
    pub fn new(command: impl Into<String>, args: Vec<String>, requested_by: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            command: command.into(),
            args,
            requested_at: Utc::now(),
            requested_by,
        }
    }

    /// The command line as typed, for log messages.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = PendingCommand::new("ls", vec![], None);
        let b = PendingCommand::new("ls", vec![], None);
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn display_line_joins_args() {
        let pending = PendingCommand::new("mkdir", vec!["-p".to_string(), "a/b".to_string()], None);
        assert_eq!(pending.display_line(), "mkdir -p a/b");
        assert_eq!(PendingCommand::new("pwd", vec![], None).display_line(), "pwd");
    }

    #[test]
    fn serializes_camel_case() {
        let pending = PendingCommand::new("cp", vec!["a".to_string(), "b".to_string()], Some("agent".to_string()));
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["command"], "cp");
        assert_eq!(json["args"][1], "b");
        assert_eq!(json["requestedBy"], "agent");
        assert!(json["requestedAt"].is_string());
    }
}
