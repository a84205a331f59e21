use crate::error::ControlError;

pub fn request_terminate(pid: u32) -> Result<(), ControlError> {
    send_signal(pid, libc::SIGTERM)
}

pub fn force_kill(pid: u32) -> Result<(), ControlError> {
    send_signal(pid, libc::SIGKILL)
}

fn send_signal(pid: u32, signal: libc::c_int) -> Result<(), ControlError> {
    // 0 and negative values address process groups, never a single process.
    let raw = match libc::pid_t::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Err(ControlError::NotFound(pid)),
    };

    let rc = unsafe { libc::kill(raw, signal) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(ControlError::NotFound(pid)),
        Some(libc::EPERM) => Err(ControlError::AccessDenied(pid)),
        _ => Err(ControlError::Other(format!(
            "signal {signal} to PID {pid} failed: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_zero_never_reaches_kill() {
        assert_eq!(send_signal(0, 0), Err(ControlError::NotFound(0)));
    }

    #[test]
    fn signal_zero_reaches_own_process() {
        assert_eq!(send_signal(std::process::id(), 0), Ok(()));
    }
}
