//! CommandService - the policy-gated command engine.
//!
//! Ties the whitelist, the approval queue, the executor and the event bus
//! together behind the operations exposed to callers:
//!
//! ```text
//!   caller ──► classify ──► SAFE ──────────────────────────► run ──► result
//!                  │
//!                  ├──────► REQUIRES_APPROVAL ──► queue ──► approve ──► run ──► result
//!                  │                                 └────► deny ──► error
//!                  └──────► FORBIDDEN / unknown ──► error
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::approval::{ApprovalQueue, ApprovalWaiter, PendingCommand};
use crate::config::ServiceConfig;
use crate::error::CommandError;
use crate::event_bus::{CommandEvent, EventBus};
use crate::executor::{run_command, CommandResult};
use crate::platform::{default_shell, Platform, PlatformInfo};
use crate::whitelist::{classify, default_entries, SecurityLevel, WhitelistEntry, WhitelistRegistry};

/// Reason recorded when a command is denied without one.
pub const DEFAULT_DENY_REASON: &str = "Command denied";

const APPROVAL_TIMEOUT_MESSAGE: &str = "Command approval timed out. If you approved this command \
in the UI, please use get_pending_commands and approve_command to complete the process.";

/// Per-call overrides for command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Execution deadline; `None` uses the service default.
    pub timeout: Option<Duration>,
    /// Identity recorded on the pending record if approval is needed.
    pub requested_by: Option<String>,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn requested_by(mut self, who: impl Into<String>) -> Self {
        self.requested_by = Some(who.into());
        self
    }
}

/// What happened to a submitted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The command was safe and ran immediately.
    Completed(CommandResult),
    /// The command was queued for approval under this ID.
    Queued(String),
}

/// Gates shell commands behind the whitelist and the approval queue.
///
/// Share it behind an `Arc`; every operation takes `&self`.
pub struct CommandService {
    config: ServiceConfig,
    shell: String,
    platform: Platform,
    whitelist: WhitelistRegistry,
    queue: Arc<ApprovalQueue>,
    events: Arc<EventBus>,
}

impl CommandService {
    /// Create a service for the detected platform.
    pub fn new(config: ServiceConfig) -> Self {
        Self::for_platform(config, Platform::detect())
    }

    /// Create a service seeded with the default whitelist of `platform`.
    pub fn for_platform(config: ServiceConfig, platform: Platform) -> Self {
        let shell = config
            .shell
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_shell(platform));
        let events = Arc::new(EventBus::with_capacity(config.event_capacity));
        let whitelist = WhitelistRegistry::with_entries(default_entries(platform));

        log::info!(
            "Command service ready on {} using {} ({} whitelist entries)",
            platform,
            shell,
            whitelist.len()
        );

        Self {
            config,
            shell,
            platform,
            whitelist,
            queue: Arc::new(ApprovalQueue::new()),
            events,
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Subscribe to command lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<CommandEvent> {
        self.events.subscribe()
    }

    pub fn platform_info(&self) -> PlatformInfo {
        PlatformInfo::new(self.platform, self.shell.clone())
    }

    // ------------------------------------------------------------------
    // Whitelist management
    // ------------------------------------------------------------------

    pub fn get_whitelist(&self) -> Vec<WhitelistEntry> {
        self.whitelist.list()
    }

    pub fn whitelist_entry(&self, command: &str) -> Option<WhitelistEntry> {
        self.whitelist.get(command)
    }

    /// Add or overwrite a whitelist entry.
    pub fn add_to_whitelist(&self, entry: WhitelistEntry) {
        log::info!("Whitelisting {} as {}", entry.command, entry.security_level);
        self.whitelist.add(entry);
    }

    /// Change the level of a whitelisted command. Unknown commands are ignored.
    pub fn update_security_level(&self, command: &str, level: SecurityLevel) {
        if !self.whitelist.update_level(command, level) {
            log::debug!("Ignoring level update for unlisted command {}", command);
        }
    }

    /// Remove a command from the whitelist. Already-pending requests for it
    /// are unaffected.
    pub fn remove_from_whitelist(&self, command: &str) {
        self.whitelist.remove(command);
    }

    /// Classify a command; `None` means not whitelisted.
    pub fn classify(&self, command: &str, args: &[String]) -> Option<SecurityLevel> {
        classify(&self.whitelist, command, args)
    }

    fn authorize(&self, command: &str, args: &[String]) -> Result<SecurityLevel, CommandError> {
        match self.classify(command, args) {
            None => Err(CommandError::NotWhitelisted(command.to_string())),
            Some(SecurityLevel::Forbidden) => Err(CommandError::Forbidden(command.to_string())),
            Some(level) => Ok(level),
        }
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Execute a command, waiting for approval if its policy requires it.
    ///
    /// Safe commands run immediately. Commands requiring approval suspend
    /// until another caller approves or denies them; there is no deadline.
    pub async fn execute_command(
        &self,
        command: &str,
        args: Vec<String>,
        options: ExecuteOptions,
    ) -> Result<CommandResult, CommandError> {
        match self.authorize(command, &args)? {
            SecurityLevel::RequiresApproval => {
                let waiter = self.queue_waiting(command, args, options.requested_by);
                waiter.wait().await
            }
            _ => self.run_now(command, &args, options.timeout).await,
        }
    }

    /// Execute a safe command now, or queue it without waiting.
    pub async fn submit(
        &self,
        command: &str,
        args: Vec<String>,
        options: ExecuteOptions,
    ) -> Result<Submission, CommandError> {
        match self.authorize(command, &args)? {
            SecurityLevel::RequiresApproval => Ok(Submission::Queued(self.queue_for_approval(
                command,
                args,
                options.requested_by,
            ))),
            _ => self
                .run_now(command, &args, options.timeout)
                .await
                .map(Submission::Completed),
        }
    }

    /// Queue a command for approval and return its ID immediately.
    ///
    /// The ID is visible in [`pending_commands`](Self::pending_commands)
    /// before this returns.
    pub fn queue_for_approval(
        &self,
        command: &str,
        args: Vec<String>,
        requested_by: Option<String>,
    ) -> String {
        let pending = PendingCommand::new(command, args, requested_by);
        let id = pending.id.clone();
        self.queue.enqueue(pending, |p| self.announce(p));
        self.schedule_approval_warning(id.clone());
        id
    }

    fn queue_waiting(
        &self,
        command: &str,
        args: Vec<String>,
        requested_by: Option<String>,
    ) -> ApprovalWaiter {
        let pending = PendingCommand::new(command, args, requested_by);
        let waiter = self.queue.enqueue_waiting(pending, |p| self.announce(p));
        self.schedule_approval_warning(waiter.id().to_string());
        waiter
    }

    fn announce(&self, pending: &PendingCommand) {
        log::info!(
            "Command {} awaiting approval: {}",
            pending.id,
            pending.display_line()
        );
        self.events.emit(CommandEvent::Pending(pending.clone()));
    }

    /// After the warning delay, publish an advisory event if the command is
    /// still pending. Never changes the queue.
    fn schedule_approval_warning(&self, id: String) {
        let delay = self.config.approval_warning_duration();
        let queue: Weak<ApprovalQueue> = Arc::downgrade(&self.queue);
        let events: Weak<EventBus> = Arc::downgrade(&self.events);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, approval warning for {} not scheduled", id);
            return;
        };

        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let (Some(queue), Some(events)) = (queue.upgrade(), events.upgrade()) else {
                return;
            };
            queue.with_pending(&id, |pending| {
                log::warn!("Command {} still awaiting approval after {:?}", pending.id, delay);
                events.emit(CommandEvent::ApprovalTimeout {
                    command_id: pending.id.clone(),
                    message: APPROVAL_TIMEOUT_MESSAGE.to_string(),
                });
            });
        });
    }

    async fn run_now(
        &self,
        command: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<CommandResult, CommandError> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout_duration());
        log::debug!("Running {} {:?} via {}", command, args, self.shell);
        run_command(command, args, &self.shell, self.platform, timeout).await
    }

    // ------------------------------------------------------------------
    // Approval decisions
    // ------------------------------------------------------------------

    /// Snapshot of commands awaiting a decision.
    pub fn pending_commands(&self) -> Vec<PendingCommand> {
        self.queue.list()
    }

    /// Approve a pending command and run it with the default timeout.
    ///
    /// The record is removed before execution, so an execution failure
    /// still leaves nothing half-pending. Execution and its event run on a
    /// detached task: dropping the returned future does not lose the
    /// decision.
    pub async fn approve_command(&self, id: &str) -> Result<CommandResult, CommandError> {
        let queued = self
            .queue
            .take(id)
            .ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        log::info!("Command {} approved: {}", id, queued.command.display_line());

        let id = id.to_string();
        let shell = self.shell.clone();
        let platform = self.platform;
        let timeout = self.config.default_timeout_duration();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            let outcome = run_command(
                &queued.command.command,
                &queued.command.args,
                &shell,
                platform,
                timeout,
            )
            .await;

            match &outcome {
                Ok(result) => {
                    events.emit(CommandEvent::Approved {
                        command_id: id.clone(),
                        result: result.clone(),
                    });
                }
                Err(err) => {
                    log::error!("Approved command {} failed: {}", id, err);
                    events.emit(CommandEvent::Failed {
                        command_id: id.clone(),
                        error: err.to_string(),
                    });
                }
            }
            queued.resolve(outcome.clone());
            outcome
        });

        task.await
            .unwrap_or_else(|e| Err(CommandError::Io(format!("approval task failed: {e}"))))
    }

    /// Deny a pending command. A blocked caller receives
    /// [`CommandError::Denied`] carrying `reason`.
    pub fn deny_command(&self, id: &str, reason: &str) -> Result<(), CommandError> {
        let queued = self
            .queue
            .take(id)
            .ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        log::info!("Command {} denied: {}", id, reason);

        self.events.emit(CommandEvent::Denied {
            command_id: id.to_string(),
            reason: reason.to_string(),
        });
        queued.resolve(Err(CommandError::Denied {
            reason: reason.to_string(),
        }));
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn test_config() -> ServiceConfig {
        ServiceConfig::new()
            .shell("/bin/sh")
            .default_timeout(Duration::from_secs(5))
    }

    fn service() -> CommandService {
        CommandService::for_platform(test_config(), Platform::Linux)
    }

    async fn next_event(rx: &mut broadcast::Receiver<CommandEvent>) -> CommandEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event bus closed")
    }

    async fn wait_for_pending(service: &CommandService) -> PendingCommand {
        for _ in 0..200 {
            if let Some(pending) = service.pending_commands().into_iter().next() {
                return pending;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no pending command appeared");
    }

    mod construction {
        use super::*;

        #[test]
        fn seeds_platform_defaults() {
            let service = service();
            assert_eq!(service.platform(), Platform::Linux);
            assert_eq!(service.shell(), "/bin/sh");
            assert_eq!(
                service.whitelist_entry("rm").unwrap().security_level,
                SecurityLevel::Forbidden
            );
            assert_eq!(
                service.whitelist_entry("echo").unwrap().security_level,
                SecurityLevel::Safe
            );
        }

        #[test]
        fn empty_shell_uses_platform_default() {
            let service = CommandService::for_platform(ServiceConfig::new().shell(""), Platform::MacOs);
            assert_eq!(service.shell(), "/bin/zsh");
        }

        #[test]
        fn platform_info_reports_shell() {
            let info = service().platform_info();
            assert_eq!(info.platform, Platform::Linux);
            assert_eq!(info.current_shell, "/bin/sh");
        }
    }

    mod whitelist {
        use super::*;

        #[test]
        fn add_overwrites_and_forbids() {
            let service = service();
            service.add_to_whitelist(WhitelistEntry::new("echo", SecurityLevel::Safe));
            service.add_to_whitelist(WhitelistEntry::new("echo", SecurityLevel::Forbidden));
            assert_eq!(service.classify("echo", &[]), Some(SecurityLevel::Forbidden));
        }

        #[test]
        fn update_level_of_unknown_is_ignored() {
            let service = service();
            let before = service.get_whitelist().len();
            service.update_security_level("ghost", SecurityLevel::Safe);
            assert_eq!(service.get_whitelist().len(), before);
            assert!(service.whitelist_entry("ghost").is_none());
        }

        #[test]
        fn remove_then_classify_is_none() {
            let service = service();
            service.remove_from_whitelist("ls");
            assert_eq!(service.classify("ls", &[]), None);
        }
    }

    #[cfg(unix)]
    mod execute {
        use super::*;

        #[tokio::test]
        async fn safe_echo_runs_immediately() {
            let service = service();
            let result = service
                .execute_command("echo", strings(&["hello"]), ExecuteOptions::new())
                .await
                .unwrap();
            assert!(result.stdout.contains("hello"));
            assert_eq!(result.stderr, "");
            assert!(service.pending_commands().is_empty());
        }

        #[tokio::test]
        async fn not_whitelisted_fails() {
            let service = service();
            let err = service
                .execute_command("definitely_not_a_command", vec![], ExecuteOptions::new())
                .await
                .unwrap_err();
            assert_eq!(
                err,
                CommandError::NotWhitelisted("definitely_not_a_command".to_string())
            );
        }

        #[tokio::test]
        async fn forbidden_fails_for_any_args() {
            let service = service();
            for args in [vec![], strings(&["-rf", "/"]), strings(&["file"])] {
                let err = service
                    .execute_command("rm", args, ExecuteOptions::new())
                    .await
                    .unwrap_err();
                assert_eq!(err, CommandError::Forbidden("rm".to_string()));
            }
            assert!(service.pending_commands().is_empty());
        }

        #[tokio::test]
        async fn per_call_timeout_overrides_default() {
            let service = service();
            service.add_to_whitelist(WhitelistEntry::new("sleep", SecurityLevel::Safe));
            let err = service
                .execute_command(
                    "sleep",
                    strings(&["5"]),
                    ExecuteOptions::new().timeout(Duration::from_millis(100)),
                )
                .await
                .unwrap_err();
            assert_eq!(err, CommandError::Timeout(Duration::from_millis(100)));
        }

        #[tokio::test]
        async fn safe_commands_run_concurrently() {
            let service = service();
            service.add_to_whitelist(WhitelistEntry::new("sleep", SecurityLevel::Safe));

            let started = std::time::Instant::now();
            let (first, second) = tokio::join!(
                service.execute_command("sleep", strings(&["1"]), ExecuteOptions::new()),
                service.execute_command("sleep", strings(&["1"]), ExecuteOptions::new()),
            );
            first.unwrap();
            second.unwrap();
            assert!(
                started.elapsed() < Duration::from_millis(1800),
                "runs were serialized: {:?}",
                started.elapsed()
            );
        }

        #[tokio::test]
        async fn unexpected_args_escalate_to_approval() {
            let service = service();
            service.add_to_whitelist(
                WhitelistEntry::new("echo", SecurityLevel::Safe).allowed_args(["ok"]),
            );

            let submission = service
                .submit("echo", strings(&["surprise"]), ExecuteOptions::new())
                .await
                .unwrap();
            assert!(matches!(submission, Submission::Queued(_)));

            let submission = service
                .submit("echo", strings(&["ok"]), ExecuteOptions::new())
                .await
                .unwrap();
            assert!(matches!(submission, Submission::Completed(r) if r.stdout == "ok\n"));
        }
    }

    #[cfg(unix)]
    mod approval {
        use super::*;
        use std::sync::Arc;

        #[tokio::test]
        async fn mkdir_is_queued_then_approved() {
            let service = service();
            let dir = tempfile::tempdir().unwrap();
            let target = dir.path().join("testdir");
            let target_arg = target.to_str().unwrap().to_string();

            let submission = service
                .submit("mkdir", vec![target_arg], ExecuteOptions::new())
                .await
                .unwrap();
            let Submission::Queued(id) = submission else {
                panic!("mkdir should require approval");
            };

            let pending = service.pending_commands();
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].command, "mkdir");
            assert_eq!(pending[0].id, id);
            assert!(!target.exists());

            let result = service.approve_command(&id).await.unwrap();
            assert_eq!(result.stderr, "");
            assert!(target.is_dir());
            assert!(service.pending_commands().is_empty());
        }

        #[tokio::test]
        async fn queue_for_approval_is_visible_immediately() {
            let service = service();
            let id = service.queue_for_approval("cp", strings(&["a", "b"]), Some("agent".to_string()));

            let pending = service.pending_commands();
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].id, id);
            assert_eq!(pending[0].requested_by.as_deref(), Some("agent"));
        }

        #[tokio::test]
        async fn approve_unknown_id_is_not_found() {
            let service = service();
            service.queue_for_approval("cp", vec![], None);

            let err = service.approve_command("nope").await.unwrap_err();
            assert_eq!(err, CommandError::NotFound("nope".to_string()));
            assert_eq!(service.pending_commands().len(), 1);
        }

        #[tokio::test]
        async fn deny_unknown_id_is_not_found() {
            let service = service();
            let err = service.deny_command("nope", "no").unwrap_err();
            assert_eq!(err, CommandError::NotFound("nope".to_string()));
        }

        #[tokio::test]
        async fn blocking_waiter_gets_approved_result() {
            let service = Arc::new(service());
            service.add_to_whitelist(WhitelistEntry::new("echo", SecurityLevel::RequiresApproval));

            let waiting = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .execute_command(
                            "echo",
                            strings(&["approved run"]),
                            ExecuteOptions::new().requested_by("tester"),
                        )
                        .await
                })
            };

            let pending = wait_for_pending(&service).await;
            assert_eq!(pending.requested_by.as_deref(), Some("tester"));

            let result = service.approve_command(&pending.id).await.unwrap();
            assert!(result.stdout.contains("approved run"));

            let waited = waiting.await.unwrap().unwrap();
            assert_eq!(waited, result);
        }

        #[tokio::test]
        async fn blocking_waiter_gets_denial_reason() {
            let service = Arc::new(service());
            service.add_to_whitelist(WhitelistEntry::new("echo", SecurityLevel::RequiresApproval));

            let waiting = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .execute_command("echo", strings(&["nope"]), ExecuteOptions::new())
                        .await
                })
            };

            let pending = wait_for_pending(&service).await;
            service.deny_command(&pending.id, "Not allowed today").unwrap();

            let err = waiting.await.unwrap().unwrap_err();
            assert!(err.to_string().contains("Not allowed today"));
            assert!(service.pending_commands().is_empty());
        }

        #[tokio::test]
        async fn decided_ids_are_never_reusable() {
            let service = service();
            let id = service.queue_for_approval("cp", vec![], None);
            service.deny_command(&id, DEFAULT_DENY_REASON).unwrap();

            assert!(service.pending_commands().iter().all(|p| p.id != id));
            assert!(matches!(
                service.approve_command(&id).await,
                Err(CommandError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn failed_execution_reports_and_clears() {
            let service = CommandService::for_platform(
                ServiceConfig::new().shell("/no/such/shell"),
                Platform::Linux,
            );
            let mut rx = service.subscribe();
            let id = service.queue_for_approval("mkdir", strings(&["x"]), None);

            let err = service.approve_command(&id).await.unwrap_err();
            assert!(matches!(err, CommandError::SpawnFailure(_)));
            assert!(service.pending_commands().is_empty());

            assert!(matches!(next_event(&mut rx).await, CommandEvent::Pending(_)));
            match next_event(&mut rx).await {
                CommandEvent::Failed { command_id, .. } => assert_eq!(command_id, id),
                other => panic!("expected failed event, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn aborted_approver_still_completes_decision() {
            let service = Arc::new(service());
            service.add_to_whitelist(WhitelistEntry::new("sleep", SecurityLevel::RequiresApproval));
            let mut rx = service.subscribe();

            let waiting = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .execute_command("sleep", strings(&["1"]), ExecuteOptions::new())
                        .await
                })
            };
            let pending = wait_for_pending(&service).await;

            let approver = {
                let service = service.clone();
                let id = pending.id.clone();
                tokio::spawn(async move { service.approve_command(&id).await })
            };
            tokio::time::sleep(Duration::from_millis(200)).await;
            approver.abort();
            assert!(service.pending_commands().is_empty());

            let waited = tokio::time::timeout(Duration::from_secs(5), waiting)
                .await
                .expect("waiter never resolved")
                .unwrap();
            assert_eq!(waited, Ok(CommandResult::default()));

            assert!(matches!(next_event(&mut rx).await, CommandEvent::Pending(_)));
            match next_event(&mut rx).await {
                CommandEvent::Approved { command_id, .. } => assert_eq!(command_id, pending.id),
                other => panic!("expected approved event, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn concurrent_approve_and_deny_have_one_winner() {
            for _ in 0..20 {
                let service = Arc::new(service());
                let id = service.queue_for_approval("echo", strings(&["race"]), None);

                let approver = {
                    let service = service.clone();
                    let id = id.clone();
                    tokio::spawn(async move { service.approve_command(&id).await.is_ok() })
                };
                let denier = {
                    let service = service.clone();
                    let id = id.clone();
                    tokio::spawn(async move { service.deny_command(&id, "race").is_ok() })
                };

                let approved = approver.await.unwrap();
                let denied = denier.await.unwrap();
                assert!(approved ^ denied, "exactly one decision must win");
                assert!(service.pending_commands().is_empty());
            }
        }
    }

    #[cfg(unix)]
    mod events {
        use super::*;

        fn quick_warning_service() -> CommandService {
            CommandService::for_platform(
                test_config().approval_warning(Duration::from_millis(50)),
                Platform::Linux,
            )
        }

        #[tokio::test]
        async fn pending_then_approved() {
            let service = service();
            let mut rx = service.subscribe();
            let id = service.queue_for_approval("echo", strings(&["hi"]), None);

            match next_event(&mut rx).await {
                CommandEvent::Pending(pending) => {
                    assert_eq!(pending.id, id);
                    assert_eq!(pending.args, vec!["hi"]);
                }
                other => panic!("expected pending event, got {other:?}"),
            }

            service.approve_command(&id).await.unwrap();
            match next_event(&mut rx).await {
                CommandEvent::Approved { command_id, result } => {
                    assert_eq!(command_id, id);
                    assert_eq!(result.stdout, "hi\n");
                }
                other => panic!("expected approved event, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn pending_then_denied() {
            let service = service();
            let mut rx = service.subscribe();
            let id = service.queue_for_approval("cp", vec![], None);
            service.deny_command(&id, "too risky").unwrap();

            assert!(matches!(next_event(&mut rx).await, CommandEvent::Pending(_)));
            match next_event(&mut rx).await {
                CommandEvent::Denied { command_id, reason } => {
                    assert_eq!(command_id, id);
                    assert_eq!(reason, "too risky");
                }
                other => panic!("expected denied event, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn approval_timeout_is_advisory() {
            let service = quick_warning_service();
            let mut rx = service.subscribe();
            let id = service.queue_for_approval("echo", strings(&["late"]), None);

            assert!(matches!(next_event(&mut rx).await, CommandEvent::Pending(_)));
            match next_event(&mut rx).await {
                CommandEvent::ApprovalTimeout { command_id, message } => {
                    assert_eq!(command_id, id);
                    assert!(message.contains("approve_command"));
                }
                other => panic!("expected approval timeout, got {other:?}"),
            }

            assert!(service.pending_commands().iter().any(|p| p.id == id));
            let result = service.approve_command(&id).await.unwrap();
            assert_eq!(result.stdout, "late\n");
        }

        #[tokio::test]
        async fn no_timeout_event_after_decision() {
            let service = quick_warning_service();
            let mut rx = service.subscribe();
            let id = service.queue_for_approval("cp", vec![], None);
            service.deny_command(&id, "no").unwrap();

            tokio::time::sleep(Duration::from_millis(200)).await;

            assert!(matches!(next_event(&mut rx).await, CommandEvent::Pending(_)));
            assert!(matches!(next_event(&mut rx).await, CommandEvent::Denied { .. }));
            assert!(rx.try_recv().is_err());
        }

        #[test]
        fn queueing_outside_runtime_skips_warning() {
            let service = service();
            let id = service.queue_for_approval("cp", vec![], None);
            assert_eq!(service.pending_commands()[0].id, id);
        }
    }
}
