//! Default whitelist seeded at service construction.

use super::types::{SecurityLevel, WhitelistEntry};
use crate::platform::Platform;

/// Cross-platform commands that are always safe.
const COMMON_SAFE: &[(&str, &str)] = &[("echo", "Print text to standard output")];

const UNIX_SAFE: &[(&str, &str)] = &[
    ("ls", "List directory contents"),
    ("pwd", "Print working directory"),
    ("cat", "Concatenate and print files"),
    ("grep", "Search for patterns in files"),
    ("find", "Find files in a directory hierarchy"),
    ("cd", "Change directory"),
    ("head", "Output the first part of files"),
    ("tail", "Output the last part of files"),
    ("wc", "Print newline, word, and byte counts"),
];

const UNIX_APPROVAL: &[(&str, &str)] = &[
    ("mv", "Move (rename) files"),
    ("cp", "Copy files and directories"),
    ("mkdir", "Create directories"),
    ("touch", "Change file timestamps or create empty files"),
    ("chmod", "Change file mode bits"),
    ("chown", "Change file owner and group"),
];

const UNIX_FORBIDDEN: &[(&str, &str)] = &[
    ("rm", "Remove files or directories"),
    ("sudo", "Execute a command as another user"),
];

const WINDOWS_SAFE: &[(&str, &str)] = &[
    ("dir", "List directory contents"),
    ("type", "Display the contents of a text file"),
    ("cd", "Change directory"),
    ("findstr", "Search for strings in files"),
    ("where", "Locate programs"),
    ("whoami", "Display current user"),
    ("hostname", "Display computer name"),
    ("ver", "Display operating system version"),
];

const WINDOWS_APPROVAL: &[(&str, &str)] = &[
    ("copy", "Copy files"),
    ("move", "Move files"),
    ("mkdir", "Create directories"),
    ("rmdir", "Remove directories"),
    ("rename", "Rename files"),
    ("attrib", "Change file attributes"),
];

const WINDOWS_FORBIDDEN: &[(&str, &str)] = &[
    ("del", "Delete files"),
    ("erase", "Delete files"),
    ("format", "Format a disk"),
    ("runas", "Execute a program as another user"),
];

fn entries<'a>(
    table: &'a [(&'a str, &'a str)],
    level: SecurityLevel,
) -> impl Iterator<Item = WhitelistEntry> + 'a {
    table
        .iter()
        .map(move |(command, description)| WhitelistEntry::new(*command, level).description(*description))
}

/// Seed entries for a platform, in insertion order: common safe, then the
/// platform's safe, approval and forbidden sets.
///
/// Unknown platforms get the Unix sets.
pub fn default_entries(platform: Platform) -> Vec<WhitelistEntry> {
    let (safe, approval, forbidden) = match platform {
        Platform::Windows => (WINDOWS_SAFE, WINDOWS_APPROVAL, WINDOWS_FORBIDDEN),
        Platform::MacOs | Platform::Linux | Platform::Unknown => {
            (UNIX_SAFE, UNIX_APPROVAL, UNIX_FORBIDDEN)
        }
    };

    entries(COMMON_SAFE, SecurityLevel::Safe)
        .chain(entries(safe, SecurityLevel::Safe))
        .chain(entries(approval, SecurityLevel::RequiresApproval))
        .chain(entries(forbidden, SecurityLevel::Forbidden))
        .collect()
}
