use std::fmt;
use std::time::Duration;

use crate::error::{ActionError, ControlError, ServiceError};
use crate::system::kill::{self, KillResult, ProcessControl};
use crate::system::platform::Capabilities;
use crate::system::services::ServiceBackend;

pub const DEFAULT_TERMINATE_TIMEOUT: Duration = Duration::from_secs(3);

/// A user-requested operation, waiting for confirmation or execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Terminate { pid: u32, name: String },
    StartService(String),
    StopService(String),
    RestartService(String),
}

impl PendingAction {
    /// Starting a service is harmless; everything else asks first.
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, PendingAction::StartService(_))
    }

    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Terminate { pid, name } => {
                format!("Terminate process {name} (PID {pid})?")
            }
            PendingAction::StartService(name) => format!("Start service '{name}'?"),
            PendingAction::StopService(name) => format!("Stop service '{name}'?"),
            PendingAction::RestartService(name) => format!("Restart service '{name}'?"),
        }
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Terminate { pid, .. } => write!(f, "terminate PID {pid}"),
            PendingAction::StartService(name) => write!(f, "start service '{name}'"),
            PendingAction::StopService(name) => write!(f, "stop service '{name}'"),
            PendingAction::RestartService(name) => write!(f, "restart service '{name}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Terminated { pid: u32, forced: bool },
    AlreadyGone(u32),
    ServiceStarted(String),
    ServiceStopped(String),
    ServiceRestarted(String),
    /// Service control on a platform without it. Nothing was attempted.
    Unsupported,
}

impl ActionOutcome {
    pub fn message(&self) -> String {
        match self {
            ActionOutcome::Terminated { pid, forced: false } => format!("Terminated PID {pid}"),
            ActionOutcome::Terminated { pid, forced: true } => {
                format!("Force killed PID {pid} after timeout")
            }
            ActionOutcome::AlreadyGone(pid) => format!("PID {pid} had already exited"),
            ActionOutcome::ServiceStarted(name) => format!("Started service '{name}'"),
            ActionOutcome::ServiceStopped(name) => format!("Stopped service '{name}'"),
            ActionOutcome::ServiceRestarted(name) => format!("Restarted service '{name}'"),
            ActionOutcome::Unsupported => {
                "Service control is only available on Windows".to_string()
            }
        }
    }
}

/// Runs one confirmed action to completion. Never called from the scheduler.
pub fn run<C, S>(
    action: &PendingAction,
    control: &mut C,
    services: &mut S,
    capabilities: Capabilities,
    terminate_timeout: Duration,
) -> Result<ActionOutcome, ActionError>
where
    C: ProcessControl + ?Sized,
    S: ServiceBackend + ?Sized,
{
    let _span = tracing::info_span!("action", %action).entered();

    let result = match action {
        PendingAction::Terminate { pid, name } => {
            terminate(control, *pid, name, terminate_timeout)
        }
        PendingAction::StartService(_)
        | PendingAction::StopService(_)
        | PendingAction::RestartService(_)
            if !capabilities.services =>
        {
            Ok(ActionOutcome::Unsupported)
        }
        PendingAction::StartService(name) => services
            .start(name)
            .map(|()| ActionOutcome::ServiceStarted(name.clone()))
            .map_err(|err| service_failure("start", name, err)),
        PendingAction::StopService(name) => services
            .stop(name)
            .map(|()| ActionOutcome::ServiceStopped(name.clone()))
            .map_err(|err| service_failure("stop", name, err)),
        PendingAction::RestartService(name) => restart(services, name),
    };

    match &result {
        Ok(outcome) => tracing::info!(outcome = %outcome.message(), "action finished"),
        Err(err) => tracing::error!(error = %err, "action failed"),
    }
    result
}

fn terminate<C: ProcessControl + ?Sized>(
    control: &mut C,
    pid: u32,
    name: &str,
    timeout: Duration,
) -> Result<ActionOutcome, ActionError> {
    let target = format!("PID {pid}");
    match kill::terminate_process(control, pid, name, timeout) {
        Ok(KillResult::Terminated(pid)) => Ok(ActionOutcome::Terminated { pid, forced: false }),
        Ok(KillResult::ForceKilled(pid)) => Ok(ActionOutcome::Terminated { pid, forced: true }),
        Ok(KillResult::AlreadyGone(pid)) | Err(ControlError::NotFound(pid)) => {
            Ok(ActionOutcome::AlreadyGone(pid))
        }
        Err(ControlError::AccessDenied(_)) => Err(ActionError::AccessDenied { target }),
        Err(ControlError::Other(detail)) => Err(ActionError::Failed {
            verb: "terminate",
            target,
            detail,
        }),
    }
}

/// Stop then start. A failed start leaves the service stopped.
fn restart<S: ServiceBackend + ?Sized>(
    services: &mut S,
    name: &str,
) -> Result<ActionOutcome, ActionError> {
    services
        .stop(name)
        .map_err(|err| service_failure("restart (stop step)", name, err))?;
    services
        .start(name)
        .map_err(|err| service_failure("restart (start step)", name, err))?;
    Ok(ActionOutcome::ServiceRestarted(name.to_string()))
}

fn service_failure(verb: &'static str, name: &str, err: ServiceError) -> ActionError {
    let target = format!("service '{name}'");
    match err {
        ServiceError::AccessDenied(_) => ActionError::AccessDenied { target },
        other => ActionError::Failed {
            verb,
            target,
            detail: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::services::ServiceRecord;

    const WINDOWS_LIKE: Capabilities = Capabilities {
        services: true,
        graceful_terminate: false,
    };
    const UNIX_LIKE: Capabilities = Capabilities {
        services: false,
        graceful_terminate: true,
    };

    /// `running` is the name of whatever currently holds the pid.
    #[derive(Default)]
    struct FakeControl {
        running: Option<String>,
        denied: bool,
        signalled: Vec<u32>,
    }

    impl FakeControl {
        fn running(name: &str) -> Self {
            FakeControl {
                running: Some(name.to_string()),
                ..Default::default()
            }
        }
    }

    impl ProcessControl for FakeControl {
        fn process_name(&mut self, _pid: u32) -> Option<String> {
            self.running.clone()
        }

        fn request_terminate(&mut self, pid: u32) -> Result<(), ControlError> {
            if self.denied {
                return Err(ControlError::AccessDenied(pid));
            }
            self.signalled.push(pid);
            self.running = None;
            Ok(())
        }

        fn force_kill(&mut self, pid: u32) -> Result<(), ControlError> {
            self.signalled.push(pid);
            self.running = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeServices {
        calls: Vec<String>,
        fail_start: Option<ServiceError>,
        fail_stop: Option<ServiceError>,
    }

    impl ServiceBackend for FakeServices {
        fn list(&mut self) -> Result<Vec<ServiceRecord>, ServiceError> {
            Ok(Vec::new())
        }

        fn start(&mut self, name: &str) -> Result<(), ServiceError> {
            self.calls.push(format!("start {name}"));
            self.fail_start.clone().map_or(Ok(()), Err)
        }

        fn stop(&mut self, name: &str) -> Result<(), ServiceError> {
            self.calls.push(format!("stop {name}"));
            self.fail_stop.clone().map_or(Ok(()), Err)
        }
    }

    fn terminate_action(pid: u32) -> PendingAction {
        PendingAction::Terminate {
            pid,
            name: "worker".into(),
        }
    }

    #[test]
    fn only_start_skips_confirmation() {
        assert!(terminate_action(1).requires_confirmation());
        assert!(!PendingAction::StartService("a".into()).requires_confirmation());
        assert!(PendingAction::StopService("a".into()).requires_confirmation());
        assert!(PendingAction::RestartService("a".into()).requires_confirmation());
    }

    #[test]
    fn terminating_a_live_process() {
        let mut control = FakeControl::running("worker");
        let outcome = run(
            &terminate_action(42),
            &mut control,
            &mut FakeServices::default(),
            UNIX_LIKE,
            Duration::from_millis(50),
        );
        assert_eq!(
            outcome,
            Ok(ActionOutcome::Terminated {
                pid: 42,
                forced: false
            })
        );
    }

    #[test]
    fn missing_process_is_informational() {
        let outcome = run(
            &terminate_action(7),
            &mut FakeControl::default(),
            &mut FakeServices::default(),
            UNIX_LIKE,
            Duration::from_millis(50),
        );
        assert_eq!(outcome, Ok(ActionOutcome::AlreadyGone(7)));
    }

    #[test]
    fn recycled_pid_is_left_alone() {
        let mut control = FakeControl::running("postgres");
        let outcome = run(
            &PendingAction::Terminate {
                pid: 500,
                name: "chrome".into(),
            },
            &mut control,
            &mut FakeServices::default(),
            UNIX_LIKE,
            Duration::from_millis(50),
        );
        assert_eq!(outcome, Ok(ActionOutcome::AlreadyGone(500)));
        assert!(control.signalled.is_empty());
    }

    #[test]
    fn permission_failure_suggests_elevation() {
        let mut control = FakeControl {
            denied: true,
            ..FakeControl::running("worker")
        };
        let err = run(
            &terminate_action(1),
            &mut control,
            &mut FakeServices::default(),
            UNIX_LIKE,
            Duration::from_millis(50),
        )
        .unwrap_err();
        assert!(err.is_access_denied());
        assert!(err.to_string().contains("PID 1"));
    }

    #[test]
    fn service_actions_are_not_attempted_without_support() {
        let mut services = FakeServices::default();
        let outcome = run(
            &PendingAction::StopService("spooler".into()),
            &mut FakeControl::default(),
            &mut services,
            UNIX_LIKE,
            DEFAULT_TERMINATE_TIMEOUT,
        );
        assert_eq!(outcome, Ok(ActionOutcome::Unsupported));
        assert!(services.calls.is_empty());
    }

    #[test]
    fn restart_is_stop_then_start() {
        let mut services = FakeServices::default();
        let outcome = run(
            &PendingAction::RestartService("spooler".into()),
            &mut FakeControl::default(),
            &mut services,
            WINDOWS_LIKE,
            DEFAULT_TERMINATE_TIMEOUT,
        );
        assert_eq!(outcome, Ok(ActionOutcome::ServiceRestarted("spooler".into())));
        assert_eq!(services.calls, vec!["stop spooler", "start spooler"]);
    }

    #[test]
    fn restart_failure_names_the_step_and_does_not_roll_back() {
        let mut services = FakeServices {
            fail_start: Some(ServiceError::Other("disabled".into())),
            ..Default::default()
        };
        let err = run(
            &PendingAction::RestartService("spooler".into()),
            &mut FakeControl::default(),
            &mut services,
            WINDOWS_LIKE,
            DEFAULT_TERMINATE_TIMEOUT,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to restart (start step) service 'spooler': disabled"
        );
        assert_eq!(services.calls, vec!["stop spooler", "start spooler"]);
    }

    #[test]
    fn service_access_denied_is_distinct() {
        let mut services = FakeServices {
            fail_stop: Some(ServiceError::AccessDenied("spooler".into())),
            ..Default::default()
        };
        let err = run(
            &PendingAction::StopService("spooler".into()),
            &mut FakeControl::default(),
            &mut services,
            WINDOWS_LIKE,
            DEFAULT_TERMINATE_TIMEOUT,
        )
        .unwrap_err();
        assert!(err.is_access_denied());
    }
}
