//! Command lifecycle event broadcasting.
//!
//! The EventBus distributes [`CommandEvent`]s to any number of consumers
//! (log sinks, operator UIs, the dispatch layer) from the command service.
//!
//! # Example
//!
//! ```rust
//! use shellgate_core::event_bus::{CommandEvent, EventBus};
//! use std::sync::Arc;
//!
//! let event_bus = Arc::new(EventBus::new());
//!
//! // Subscribe to events
//! let mut rx = event_bus.subscribe();
//!
//! // Emit an event
//! event_bus.emit(CommandEvent::Denied {
//!     command_id: "abc123".to_string(),
//!     reason: "not now".to_string(),
//! });
//!
//! // Receive the event (in async context)
//! // let event = rx.recv().await.unwrap();
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::approval::PendingCommand;
use crate::executor::CommandResult;

/// Default channel capacity for the event bus.
/// Events beyond this capacity will cause slow subscribers to miss events (lag).
const DEFAULT_CAPACITY: usize = 1024;

/// A lifecycle notification about a command awaiting or leaving approval.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandEvent {
    /// A command was queued for approval.
    Pending(PendingCommand),

    /// An approved command ran to completion.
    #[serde(rename_all = "camelCase")]
    Approved {
        command_id: String,
        result: CommandResult,
    },

    /// An operator denied a pending command.
    #[serde(rename_all = "camelCase")]
    Denied { command_id: String, reason: String },

    /// An approved command failed to execute.
    #[serde(rename_all = "camelCase")]
    Failed { command_id: String, error: String },

    /// A command has been pending longer than the warning threshold.
    /// Informational only; the command can still be approved or denied.
    #[serde(rename_all = "camelCase")]
    ApprovalTimeout { command_id: String, message: String },
}

impl CommandEvent {
    /// Event type identifier (e.g. `command:pending`).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Pending(_) => "command:pending",
            Self::Approved { .. } => "command:approved",
            Self::Denied { .. } => "command:denied",
            Self::Failed { .. } => "command:failed",
            Self::ApprovalTimeout { .. } => "command:approval_timeout",
        }
    }

    /// ID of the pending command this event is about.
    pub fn command_id(&self) -> &str {
        match self {
            Self::Pending(pending) => &pending.id,
            Self::Approved { command_id, .. }
            | Self::Denied { command_id, .. }
            | Self::Failed { command_id, .. }
            | Self::ApprovalTimeout { command_id, .. } => command_id,
        }
    }
}

/// Broadcasts command events to multiple subscribers.
///
/// Uses a tokio broadcast channel internally. Emitting never fails and never
/// blocks, so nothing a subscriber does can affect the emitter.
pub struct EventBus {
    sender: broadcast::Sender<CommandEvent>,
}

impl EventBus {
    /// Create a new EventBus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new EventBus with specified capacity.
    ///
    /// The capacity determines how many events can be buffered before slow
    /// subscribers start missing events (experiencing lag).
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// If there are no subscribers, the event is dropped and 0 is returned.
    pub fn emit(&self, event: CommandEvent) -> usize {
        log::debug!("{} {}", event.event_type(), event.command_id());
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to all events on this bus.
    ///
    /// Returns a receiver that will receive all future events.
    /// Past events are not delivered to new subscribers.
    pub fn subscribe(&self) -> broadcast::Receiver<CommandEvent> {
        self.sender.subscribe()
    }

    /// Get the current number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Run `listener` on its own task for every future event.
    ///
    /// A panicking listener is logged and keeps receiving later events.
    /// The task ends when the bus is dropped. Must be called from within a
    /// tokio runtime.
    pub fn spawn_listener<F>(&self, name: &str, listener: F) -> JoinHandle<()>
    where
        F: Fn(&CommandEvent) + Send + 'static,
    {
        let mut rx = self.subscribe();
        let name = name.to_string();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                            log::error!(
                                "Event listener '{}' panicked handling {} for {}",
                                name,
                                event.event_type(),
                                event.command_id()
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        log::warn!("Event listener '{}' lagged, missed {} events", name, missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
