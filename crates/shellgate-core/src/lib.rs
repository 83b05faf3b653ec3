//! # shellgate-core
//!
//! Core engine for Shellgate, a policy gate in front of shell commands
//! requested by automated callers.
//!
//! This crate is framework-agnostic and can be used by:
//! - The stdio daemon (via JSON tool calls)
//! - Any embedding application that wants the engine directly
//!
//! ## Key Concepts
//!
//! - **Whitelist**: per-command security level (safe, requires approval, forbidden)
//! - **Pending command**: a queued request waiting for an operator's decision
//! - **CommandEvent**: lifecycle notifications published on the event bus

pub mod approval;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod executor;
pub mod logging;
pub mod platform;
pub mod service;
pub mod whitelist;

// Re-export commonly used types
pub use approval::PendingCommand;
pub use config::ServiceConfig;
pub use error::CommandError;
pub use event_bus::{CommandEvent, EventBus};
pub use executor::CommandResult;
pub use platform::{Platform, PlatformInfo};
pub use service::{CommandService, ExecuteOptions, Submission};
pub use whitelist::{SecurityLevel, WhitelistEntry};
