use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate};

use super::collector::Collector;
use super::platform;
use crate::error::ControlError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Signal-level operations against one process.
pub trait ProcessControl {
    /// Name of the live process currently holding `pid`, or `None` when
    /// nothing (or only a zombie) runs there.
    fn process_name(&mut self, pid: u32) -> Option<String>;
    fn request_terminate(&mut self, pid: u32) -> Result<(), ControlError>;
    fn force_kill(&mut self, pid: u32) -> Result<(), ControlError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillResult {
    /// Exited after the polite request.
    Terminated(u32),
    /// Still running at the deadline and was killed.
    ForceKilled(u32),
    /// Not running when we looked, or the pid now belongs to another program.
    AlreadyGone(u32),
}

/// Polite request, bounded wait, then force.
///
/// `expected_name` is the name the pid had when the user picked it. Pids are
/// recycled, so a live process under a different name is left alone.
pub fn terminate_process<C: ProcessControl + ?Sized>(
    control: &mut C,
    pid: u32,
    expected_name: &str,
    timeout: Duration,
) -> Result<KillResult, ControlError> {
    if !is_target(control, pid, expected_name) {
        return Ok(KillResult::AlreadyGone(pid));
    }

    match control.request_terminate(pid) {
        Ok(()) => {}
        Err(ControlError::NotFound(_)) => return Ok(KillResult::AlreadyGone(pid)),
        Err(err) => return Err(err),
    }

    let deadline = Instant::now() + timeout;
    loop {
        if !is_target(control, pid, expected_name) {
            return Ok(KillResult::Terminated(pid));
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(POLL_INTERVAL.min(timeout));
    }

    tracing::info!(pid, ?timeout, "process ignored termination request, forcing");
    match control.force_kill(pid) {
        Ok(()) | Err(ControlError::NotFound(_)) => Ok(KillResult::ForceKilled(pid)),
        Err(err) => Err(err),
    }
}

fn is_target<C: ProcessControl + ?Sized>(control: &mut C, pid: u32, expected_name: &str) -> bool {
    match control.process_name(pid) {
        Some(name) if name == expected_name => true,
        Some(name) => {
            tracing::warn!(pid, expected = expected_name, found = %name, "pid was reused");
            false
        }
        None => false,
    }
}

impl ProcessControl for Collector {
    fn process_name(&mut self, pid: u32) -> Option<String> {
        let sys_pid = Pid::from_u32(pid);
        let pids = [sys_pid];
        let sys = self.system_mut();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing(),
        );
        sys.process(sys_pid)
            .filter(|process| {
                !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
            })
            .map(|process| process.name().to_string_lossy().to_string())
    }

    fn request_terminate(&mut self, pid: u32) -> Result<(), ControlError> {
        platform::request_terminate(pid)
    }

    fn force_kill(&mut self, pid: u32) -> Result<(), ControlError> {
        platform::force_kill(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exits on the first polite request unless `stubborn`.
    struct FakeControl {
        name: String,
        alive: bool,
        stubborn: bool,
        /// Another program takes the pid as soon as the first one exits.
        reused_after_exit: Option<String>,
        term_error: Option<ControlError>,
        signalled: bool,
        killed: bool,
    }

    impl FakeControl {
        fn running() -> Self {
            FakeControl {
                name: "worker".into(),
                alive: true,
                stubborn: false,
                reused_after_exit: None,
                term_error: None,
                signalled: false,
                killed: false,
            }
        }
    }

    impl ProcessControl for FakeControl {
        fn process_name(&mut self, _pid: u32) -> Option<String> {
            self.alive.then(|| self.name.clone())
        }

        fn request_terminate(&mut self, _pid: u32) -> Result<(), ControlError> {
            if let Some(err) = self.term_error.clone() {
                return Err(err);
            }
            self.signalled = true;
            if !self.stubborn {
                match self.reused_after_exit.take() {
                    Some(next) => self.name = next,
                    None => self.alive = false,
                }
            }
            Ok(())
        }

        fn force_kill(&mut self, _pid: u32) -> Result<(), ControlError> {
            self.killed = true;
            self.alive = false;
            Ok(())
        }
    }

    #[test]
    fn dead_target_is_already_gone() {
        let mut control = FakeControl::running();
        control.alive = false;
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(10));
        assert_eq!(result, Ok(KillResult::AlreadyGone(42)));
    }

    #[test]
    fn cooperative_target_is_terminated_without_force() {
        let mut control = FakeControl::running();
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(50));
        assert_eq!(result, Ok(KillResult::Terminated(42)));
        assert!(!control.killed);
    }

    #[test]
    fn stubborn_target_is_force_killed_after_timeout() {
        let mut control = FakeControl::running();
        control.stubborn = true;
        let started = Instant::now();
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(30));
        assert_eq!(result, Ok(KillResult::ForceKilled(42)));
        assert!(control.killed);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn reused_pid_is_never_signalled() {
        let mut control = FakeControl::running();
        control.name = "postgres".into();
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(10));
        assert_eq!(result, Ok(KillResult::AlreadyGone(42)));
        assert!(!control.signalled);
        assert!(!control.killed);
    }

    #[test]
    fn pid_reused_during_wait_is_not_force_killed() {
        let mut control = FakeControl::running();
        control.reused_after_exit = Some("postgres".into());
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(30));
        assert_eq!(result, Ok(KillResult::Terminated(42)));
        assert!(!control.killed);
    }

    #[test]
    fn access_denied_is_propagated() {
        let mut control = FakeControl::running();
        control.term_error = Some(ControlError::AccessDenied(42));
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(10));
        assert_eq!(result, Err(ControlError::AccessDenied(42)));
    }

    #[test]
    fn vanishing_between_check_and_signal_is_already_gone() {
        let mut control = FakeControl::running();
        control.term_error = Some(ControlError::NotFound(42));
        let result = terminate_process(&mut control, 42, "worker", Duration::from_millis(10));
        assert_eq!(result, Ok(KillResult::AlreadyGone(42)));
    }
}
