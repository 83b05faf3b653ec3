//! Mirrors command lifecycle events to the log file and stderr log.

use shellgate_core::logging::{LogLevel, LogSink};
use shellgate_core::{CommandEvent, CommandService};
use tokio::task::JoinHandle;

/// Render an event as a log line with its severity.
pub fn describe(event: &CommandEvent) -> (LogLevel, String) {
    match event {
        CommandEvent::Pending(cmd) => (
            LogLevel::Info,
            format!("Command pending approval: {} ({})", cmd.display_line(), cmd.id),
        ),
        CommandEvent::Approved { command_id, .. } => (
            LogLevel::Info,
            format!("Command approved and executed: {command_id}"),
        ),
        CommandEvent::Denied { command_id, reason } => (
            LogLevel::Info,
            format!("Command denied: {command_id}, reason: {reason}"),
        ),
        CommandEvent::Failed { command_id, error } => (
            LogLevel::Error,
            format!("Command failed: {command_id}, error: {error}"),
        ),
        CommandEvent::ApprovalTimeout { command_id, message } => (
            LogLevel::Error,
            format!("Command approval timed out: {command_id}, {message}"),
        ),
    }
}

/// Register a listener that writes every event to `sink` and `log`.
pub fn mirror_to_sink(service: &CommandService, sink: LogSink) -> JoinHandle<()> {
    service.events().spawn_listener("log-mirror", move |event| {
        let (level, line) = describe(event);
        match level {
            LogLevel::Error => log::error!("{}", line),
            _ => log::info!("{}", line),
        }
        sink.log(level, &line);
    })
}
