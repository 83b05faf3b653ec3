//! Command whitelist policy.
//!
//! Decides whether a command runs immediately, waits for approval, or is
//! rejected:
//! - Registry of per-command entries, seeded per platform
//! - Positional exact-match argument restrictions
//! - Classification by base command name

mod defaults;
mod registry;
mod types;
mod validator;

pub use defaults::default_entries;
pub use registry::WhitelistRegistry;
pub use types::{SecurityLevel, WhitelistEntry};
pub use validator::{base_command, classify, classify_entry};
