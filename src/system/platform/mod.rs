use crate::error::ControlError;

/// Platform features resolved once at startup.
///
/// Call sites branch on these flags instead of checking the target again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// A service manager we can list and control.
    pub services: bool,
    /// A polite termination request distinct from a forced kill.
    pub graceful_terminate: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Capabilities {
            services: cfg!(windows),
            graceful_terminate: cfg!(unix),
        }
    }
}

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as platform_impl;
#[cfg(windows)]
use windows as platform_impl;

#[cfg(windows)]
pub type NativeServices = windows::WindowsServices;
#[cfg(not(windows))]
pub type NativeServices = crate::system::services::UnsupportedServices;

/// Asks the process to exit (SIGTERM on Unix).
pub fn request_terminate(pid: u32) -> Result<(), ControlError> {
    platform_impl::request_terminate(pid)
}

/// Ends the process without giving it a chance to clean up.
pub fn force_kill(pid: u32) -> Result<(), ControlError> {
    platform_impl::force_kill(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_follow_the_platform() {
        let caps = Capabilities::detect();
        assert_eq!(caps.services, cfg!(windows));
    }

    #[test]
    fn terminating_an_impossible_pid_is_not_found() {
        assert_eq!(
            request_terminate(u32::MAX),
            Err(ControlError::NotFound(u32::MAX))
        );
        assert_eq!(force_kill(u32::MAX), Err(ControlError::NotFound(u32::MAX)));
    }
}
