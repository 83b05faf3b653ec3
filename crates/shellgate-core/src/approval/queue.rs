//! Pending approval queue.
//!
//! Holds commands between PENDING and their terminal APPROVED/DENIED state.
//! Every mutation is a single check-and-act under one lock, so two racing
//! decisions on the same ID yield one winner and one `NotFound`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

use super::types::PendingCommand;
use crate::error::CommandError;
use crate::executor::CommandResult;

/// Outcome delivered to whoever is waiting on a pending command.
pub type Decision = Result<CommandResult, CommandError>;

/// A pending command removed from the queue, ready to be resolved.
///
/// Holds the completion handle for blocking requests. Consuming the ticket
/// with [`resolve`](Self::resolve) fulfils it exactly once.
#[derive(Debug)]
pub struct QueuedCommand {
    pub command: PendingCommand,
    waiter: Option<oneshot::Sender<Decision>>,
}

impl QueuedCommand {
    /// Deliver the decision to the blocked caller, if there is one.
    pub fn resolve(self, decision: Decision) {
        if let Some(waiter) = self.waiter {
            // The waiter may have given up; nothing to deliver to then.
            let _ = waiter.send(decision);
        }
    }
}

/// Receiving half for a blocking approval request.
#[derive(Debug)]
pub struct ApprovalWaiter {
    id: String,
    receiver: oneshot::Receiver<Decision>,
}

impl ApprovalWaiter {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for approve or deny. There is no deadline.
    pub async fn wait(self) -> Decision {
        self.receiver
            .await
            .unwrap_or(Err(CommandError::ApprovalAbandoned(self.id)))
    }
}

/// Thread-safe map of pending commands keyed by ID.
#[derive(Debug, Default)]
pub struct ApprovalQueue {
    pending: Mutex<HashMap<String, QueuedCommand>>,
}

impl ApprovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command nobody waits on. Decisions are only observable
    /// through events and the return value of approve/deny.
    ///
    /// `on_queued` runs under the queue lock right after insertion, so
    /// anything it publishes precedes any decision on the command.
    pub fn enqueue<F>(&self, command: PendingCommand, on_queued: F)
    where
        F: FnOnce(&PendingCommand),
    {
        self.insert(
            QueuedCommand {
                command,
                waiter: None,
            },
            on_queued,
        );
    }

    /// Queue a command and return a handle that completes on its decision.
    pub fn enqueue_waiting<F>(&self, command: PendingCommand, on_queued: F) -> ApprovalWaiter
    where
        F: FnOnce(&PendingCommand),
    {
        let (tx, rx) = oneshot::channel();
        let id = command.id.clone();
        self.insert(
            QueuedCommand {
                command,
                waiter: Some(tx),
            },
            on_queued,
        );
        ApprovalWaiter { id, receiver: rx }
    }

    fn insert<F>(&self, queued: QueuedCommand, on_queued: F)
    where
        F: FnOnce(&PendingCommand),
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(!pending.contains_key(&queued.command.id));
        let queued = pending
            .entry(queued.command.id.clone())
            .or_insert(queued);
        on_queued(&queued.command);
    }

    /// Atomically look up and remove a pending command.
    pub fn take(&self, id: &str) -> Option<QueuedCommand> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Run `f` on the record while holding the queue lock, if still pending.
    ///
    /// Returns whether the command was pending. A concurrent `take` cannot
    /// interleave with `f`.
    pub fn with_pending<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&PendingCommand),
    {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.get(id) {
            Some(queued) => {
                f(&queued.command);
                true
            }
            None => false,
        }
    }

    /// Snapshot of pending commands, oldest first.
    pub fn list(&self) -> Vec<PendingCommand> {
        let mut commands: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|queued| queued.command.clone())
            .collect();
        commands.sort_by_key(|c| c.requested_at);
        commands
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
