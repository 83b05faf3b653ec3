//! Platform detection and shell location.
//!
//! Supplies the default shell for the running platform, plus the
//! suggestions and help text surfaced by `get_platform_info`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Operating system family the service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform this binary was built for.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default shell executable for a platform.
///
/// Windows honours `COMSPEC`, Linux and unknown platforms honour `SHELL`.
/// macOS always uses zsh.
pub fn default_shell(platform: Platform) -> String {
    match platform {
        Platform::Windows => std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
        Platform::MacOs => "/bin/zsh".to_string(),
        Platform::Linux => std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string()),
        Platform::Unknown => std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
    }
}

/// Shells worth suggesting to a user configuring a custom shell.
pub fn shell_suggestions(platform: Platform) -> Vec<String> {
    let shells: &[&str] = match platform {
        Platform::Windows => &["cmd.exe", "powershell.exe", "pwsh.exe"],
        Platform::MacOs => &["/bin/zsh", "/bin/bash", "/bin/sh"],
        Platform::Linux => &["/bin/bash", "/bin/sh", "/bin/zsh"],
        Platform::Unknown => &["/bin/sh"],
    };
    shells.iter().map(|s| s.to_string()).collect()
}

/// Common install locations of shells on a platform.
pub fn common_shell_locations(platform: Platform) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            std::env::var("COMSPEC")
                .unwrap_or_else(|_| r"C:\Windows\System32\cmd.exe".to_string()),
            r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe".to_string(),
            r"C:\Program Files\PowerShell\7\pwsh.exe".to_string(),
        ],
        Platform::MacOs => vec![
            "/bin/zsh".to_string(),
            "/bin/bash".to_string(),
            "/bin/sh".to_string(),
        ],
        Platform::Linux => vec![
            "/bin/bash".to_string(),
            "/bin/sh".to_string(),
            "/usr/bin/bash".to_string(),
            "/usr/bin/zsh".to_string(),
        ],
        Platform::Unknown => vec!["/bin/sh".to_string()],
    }
}

/// Check that a shell path exists and is a regular file.
pub fn validate_shell_path(shell_path: &str) -> bool {
    Path::new(shell_path).is_file()
}

/// Human-readable help for configuring the shell.
pub fn shell_configuration_help(platform: Platform) -> String {
    let mut message = String::from("Shell Configuration Help:\n\n");
    message.push_str(&format!("Detected platform: {platform}\n\n"));
    message.push_str("Suggested shells for this platform:\n");
    for shell in shell_suggestions(platform) {
        message.push_str(&format!("- {shell}\n"));
    }
    message.push_str("\nCommon shell locations on this platform:\n");
    for location in common_shell_locations(platform) {
        message.push_str(&format!("- {location}\n"));
    }
    message.push_str(
        "\nTo configure a custom shell, provide the full path to the shell executable.",
    );
    message
}

/// Snapshot returned by the `get_platform_info` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub platform: Platform,
    pub current_shell: String,
    pub suggested_shells: Vec<String>,
    pub common_locations: Vec<String>,
    pub help_message: String,
}

impl PlatformInfo {
    pub fn new(platform: Platform, current_shell: impl Into<String>) -> Self {
        let current_shell = current_shell.into();
        Self {
            platform,
            help_message: format!(
                "Shellgate is running on {platform} using {current_shell}\n\n{}",
                shell_configuration_help(platform)
            ),
            current_shell,
            suggested_shells: shell_suggestions(platform),
            common_locations: common_shell_locations(platform),
        }
    }
}
