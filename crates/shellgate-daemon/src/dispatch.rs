//! Tool dispatch.
//!
//! Maps named tool calls onto [`CommandService`] operations and renders the
//! outcome as the text returned to the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shellgate_core::service::DEFAULT_DENY_REASON;
use shellgate_core::{
    CommandResult, CommandService, ExecuteOptions, SecurityLevel, Submission, WhitelistEntry,
};

/// Names of every supported tool.
pub const TOOL_NAMES: &[&str] = &[
    "get_platform_info",
    "execute_command",
    "get_whitelist",
    "add_to_whitelist",
    "update_security_level",
    "remove_from_whitelist",
    "get_pending_commands",
    "approve_command",
    "deny_command",
];

/// Text result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolOutput> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolOutput::error(format!("Missing required argument: {key}")))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn string_list(args: &Value, key: &str) -> Result<Vec<String>, ToolOutput> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|_| ToolOutput::error(format!("Argument '{key}' must be an array of strings"))),
    }
}

fn security_level(args: &Value) -> Result<SecurityLevel, ToolOutput> {
    required_str(args, "securityLevel")?
        .parse()
        .map_err(ToolOutput::error)
}

fn pretty_json<T: Serialize>(value: &T) -> ToolOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => ToolOutput::ok(json),
        Err(e) => ToolOutput::error(format!("Failed to serialize response: {e}")),
    }
}

/// Format a command result: stdout, then stderr on its own marked line.
fn format_result(result: &CommandResult) -> String {
    let mut parts = Vec::new();
    if !result.stdout.is_empty() {
        parts.push(result.stdout.clone());
    }
    if !result.stderr.is_empty() {
        parts.push(format!("Error output: {}", result.stderr));
    }
    parts.join("\n")
}

/// Run one tool call against the service.
pub async fn dispatch(service: &CommandService, tool: &str, args: &Value) -> ToolOutput {
    log::debug!("Tool call: {} with args: {}", tool, args);

    let outcome = match tool {
        "get_platform_info" => Ok(pretty_json(&service.platform_info())),
        "execute_command" => execute_command(service, args).await,
        "get_whitelist" => Ok(pretty_json(&service.get_whitelist())),
        "add_to_whitelist" => add_to_whitelist(service, args),
        "update_security_level" => update_security_level(service, args),
        "remove_from_whitelist" => remove_from_whitelist(service, args),
        "get_pending_commands" => Ok(pretty_json(&service.pending_commands())),
        "approve_command" => approve_command(service, args).await,
        "deny_command" => deny_command(service, args),
        _ => Err(ToolOutput::error(format!("Unknown tool: {tool}"))),
    };

    outcome.unwrap_or_else(|err| err)
}

async fn execute_command(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let command = required_str(args, "command")?;
    let command_args = string_list(args, "args")?;
    let mut options = ExecuteOptions::new();
    if let Some(who) = optional_str(args, "requestedBy") {
        options = options.requested_by(who);
    }

    match service.submit(command, command_args, options).await {
        Ok(Submission::Completed(result)) => Ok(ToolOutput::ok(format_result(&result))),
        Ok(Submission::Queued(id)) => Ok(ToolOutput::ok(format!(
            "This command requires approval. It has been queued with ID: {id}\n\n\
             Please approve this command in the UI or use the 'approve_command' tool with this command ID."
        ))),
        Err(e) => {
            log::warn!("Command execution failed: {}", e);
            Err(ToolOutput::error(format!("Command execution failed: {e}")))
        }
    }
}

fn add_to_whitelist(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let command = required_str(args, "command")?;
    let level = security_level(args)?;

    let mut entry = WhitelistEntry::new(command, level);
    if let Some(description) = optional_str(args, "description") {
        entry = entry.description(description);
    }
    if args.get("allowedArgs").is_some_and(|v| !v.is_null()) {
        entry.allowed_args = Some(string_list(args, "allowedArgs")?);
    }
    service.add_to_whitelist(entry);

    Ok(ToolOutput::ok(format!(
        "Command '{command}' added to whitelist with security level '{level}'"
    )))
}

fn update_security_level(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let command = required_str(args, "command")?;
    let level = security_level(args)?;
    service.update_security_level(command, level);

    Ok(ToolOutput::ok(format!(
        "Security level for command '{command}' updated to '{level}'"
    )))
}

fn remove_from_whitelist(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let command = required_str(args, "command")?;
    service.remove_from_whitelist(command);
    Ok(ToolOutput::ok(format!("Command '{command}' removed from whitelist")))
}

async fn approve_command(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let id = required_str(args, "commandId")?;

    match service.approve_command(id).await {
        Ok(result) => {
            let mut text = format!(
                "Command approved and executed successfully.\nOutput: {}",
                result.stdout
            );
            if !result.stderr.is_empty() {
                text.push_str(&format!("\nError output: {}", result.stderr));
            }
            Ok(ToolOutput::ok(text))
        }
        Err(e) => {
            log::error!("Approval of {} failed: {}", id, e);
            Err(ToolOutput::error(format!("Command approval failed: {e}")))
        }
    }
}

fn deny_command(service: &CommandService, args: &Value) -> Result<ToolOutput, ToolOutput> {
    let id = required_str(args, "commandId")?;
    let reason = optional_str(args, "reason").filter(|r| !r.is_empty());

    match service.deny_command(id, reason.unwrap_or(DEFAULT_DENY_REASON)) {
        Ok(()) => Ok(ToolOutput::ok(match reason {
            Some(reason) => format!("Command denied: {reason}"),
            None => "Command denied".to_string(),
        })),
        Err(e) => {
            log::error!("Denial of {} failed: {}", id, e);
            Err(ToolOutput::error(format!("Command denial failed: {e}")))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
