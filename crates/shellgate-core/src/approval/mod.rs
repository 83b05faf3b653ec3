//! Approval state machine.
//!
//! A command classified as requiring approval is queued as PENDING and
//! leaves the queue exactly once, as APPROVED or DENIED:
//! - Blocking requests hold an [`ApprovalWaiter`] that completes on the decision
//! - Non-blocking requests only get the generated ID back
//! - Nothing expires on its own; the advisory timeout is an event, not a transition

mod queue;
mod types;

pub use queue::{ApprovalQueue, ApprovalWaiter, Decision, QueuedCommand};
pub use types::PendingCommand;
