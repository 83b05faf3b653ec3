//! Command classification against the whitelist.
//!
//! The rule is "escalate on uncertainty": an entry that restricts its
//! argument shape can never run as safe with arguments it did not expect.

use super::registry::WhitelistRegistry;
use super::types::{SecurityLevel, WhitelistEntry};

/// Strip any directory prefix, under either separator style.
///
/// `/usr/bin/ls` and `C:\Windows\cmd.exe` become `ls` and `cmd.exe`.
pub fn base_command(command: &str) -> &str {
    command.rsplit(['/', '\\']).next().unwrap_or(command)
}

/// Classify a command and its arguments.
///
/// Returns `None` when the base command is not whitelisted.
pub fn classify(
    registry: &WhitelistRegistry,
    command: &str,
    args: &[String],
) -> Option<SecurityLevel> {
    registry
        .get(base_command(command))
        .map(|entry| classify_entry(&entry, args))
}

/// Classify arguments against a single entry.
///
/// Forbidden entries are forbidden regardless of arguments. An entry with
/// `allowed_args` only keeps its own level when every argument matches the
/// pattern at the same position exactly; extra arguments or any mismatch
/// escalate to [`SecurityLevel::RequiresApproval`].
pub fn classify_entry(entry: &WhitelistEntry, args: &[String]) -> SecurityLevel {
    if entry.security_level == SecurityLevel::Forbidden {
        return SecurityLevel::Forbidden;
    }

    let Some(allowed) = &entry.allowed_args else {
        return entry.security_level;
    };

    if args.len() > allowed.len() {
        return SecurityLevel::RequiresApproval;
    }

    let all_match = args
        .iter()
        .zip(allowed.iter())
        .all(|(arg, pattern)| arg == pattern);

    if all_match {
        entry.security_level
    } else {
        SecurityLevel::RequiresApproval
    }
}
