//! Whitelist entry types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Policy classification of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Run immediately.
    Safe,
    /// Queue until an operator approves or denies.
    RequiresApproval,
    /// Never run.
    Forbidden,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::RequiresApproval => "requires_approval",
            Self::Forbidden => "forbidden",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Self::Safe),
            "requires_approval" => Ok(Self::RequiresApproval),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(format!(
                "Invalid security level '{other}' (expected safe, requires_approval or forbidden)"
            )),
        }
    }
}

/// A single whitelist policy, keyed by its base command name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    pub command: String,
    pub security_level: SecurityLevel,
    /// Exact argument values accepted at each position. Anything else
    /// escalates to [`SecurityLevel::RequiresApproval`].
    #[serde(default)]
    pub allowed_args: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WhitelistEntry {
    pub fn new(command: impl Into<String>, security_level: SecurityLevel) -> Self {
        Self {
            command: command.into(),
            security_level,
            allowed_args: None,
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn allowed_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_args = Some(args.into_iter().map(Into::into).collect());
        self
    }
}
