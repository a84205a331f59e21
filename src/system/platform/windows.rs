use std::time::{Duration, Instant};

use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, ERROR_MORE_DATA,
    ERROR_SERVICE_ALREADY_RUNNING, ERROR_SERVICE_DOES_NOT_EXIST, ERROR_SERVICE_NOT_ACTIVE,
    GetLastError,
};
use windows_sys::Win32::System::Services::{
    CloseServiceHandle, ControlService, ENUM_SERVICE_STATUS_PROCESSW, EnumServicesStatusExW,
    OpenSCManagerW, OpenServiceW, QueryServiceStatus, SC_ENUM_PROCESS_INFO, SC_HANDLE,
    SC_MANAGER_CONNECT, SC_MANAGER_ENUMERATE_SERVICE, SERVICE_CONTINUE_PENDING,
    SERVICE_CONTROL_STOP, SERVICE_PAUSE_PENDING, SERVICE_PAUSED, SERVICE_QUERY_STATUS,
    SERVICE_RUNNING, SERVICE_START, SERVICE_START_PENDING, SERVICE_STATE_ALL, SERVICE_STATUS,
    SERVICE_STOP, SERVICE_STOP_PENDING, SERVICE_STOPPED, SERVICE_WIN32, StartServiceW,
};
use windows_sys::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

use crate::error::{ControlError, ServiceError};
use crate::system::services::{ServiceBackend, ServiceRecord};

const STOP_WAIT: Duration = Duration::from_secs(10);
const STOP_POLL: Duration = Duration::from_millis(200);

// Windows has no polite termination for arbitrary processes, so both
// requests end in TerminateProcess.
pub fn request_terminate(pid: u32) -> Result<(), ControlError> {
    terminate_process(pid)
}

pub fn force_kill(pid: u32) -> Result<(), ControlError> {
    terminate_process(pid)
}

fn terminate_process(pid: u32) -> Result<(), ControlError> {
    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            return Err(match GetLastError() {
                ERROR_ACCESS_DENIED => ControlError::AccessDenied(pid),
                ERROR_INVALID_PARAMETER => ControlError::NotFound(pid),
                code => ControlError::Other(format!("OpenProcess({pid}) failed: error {code}")),
            });
        }
        let ok = TerminateProcess(handle, 1);
        let code = GetLastError();
        CloseHandle(handle);
        if ok == 0 {
            return Err(match code {
                ERROR_ACCESS_DENIED => ControlError::AccessDenied(pid),
                code => ControlError::Other(format!("TerminateProcess({pid}) failed: error {code}")),
            });
        }
    }
    Ok(())
}

struct ScHandle(SC_HANDLE);

impl Drop for ScHandle {
    fn drop(&mut self) {
        unsafe {
            CloseServiceHandle(self.0);
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

unsafe fn from_wide(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}

fn state_label(state: u32) -> &'static str {
    match state {
        SERVICE_RUNNING => "running",
        SERVICE_STOPPED => "stopped",
        SERVICE_PAUSED => "paused",
        SERVICE_START_PENDING => "start_pending",
        SERVICE_STOP_PENDING => "stop_pending",
        SERVICE_CONTINUE_PENDING => "continue_pending",
        SERVICE_PAUSE_PENDING => "pause_pending",
        _ => "unknown",
    }
}

fn service_error(name: &str, call: &str) -> ServiceError {
    match unsafe { GetLastError() } {
        ERROR_ACCESS_DENIED => ServiceError::AccessDenied(name.to_string()),
        ERROR_SERVICE_DOES_NOT_EXIST => ServiceError::NotFound(name.to_string()),
        code => ServiceError::Other(format!("{call} failed for '{name}': error {code}")),
    }
}

/// Service Control Manager client.
#[derive(Debug, Default)]
pub struct WindowsServices;

impl WindowsServices {
    fn manager(access: u32) -> Result<ScHandle, ServiceError> {
        let handle = unsafe { OpenSCManagerW(std::ptr::null(), std::ptr::null(), access) };
        if handle.is_null() {
            return Err(service_error("service manager", "OpenSCManagerW"));
        }
        Ok(ScHandle(handle))
    }

    fn open(name: &str, access: u32) -> Result<ScHandle, ServiceError> {
        let manager = Self::manager(SC_MANAGER_CONNECT)?;
        let wide = to_wide(name);
        let handle = unsafe { OpenServiceW(manager.0, wide.as_ptr(), access) };
        if handle.is_null() {
            return Err(service_error(name, "OpenServiceW"));
        }
        Ok(ScHandle(handle))
    }

    fn current_state(service: &ScHandle, name: &str) -> Result<u32, ServiceError> {
        let mut status: SERVICE_STATUS = unsafe { std::mem::zeroed() };
        if unsafe { QueryServiceStatus(service.0, &mut status) } == 0 {
            return Err(service_error(name, "QueryServiceStatus"));
        }
        Ok(status.dwCurrentState)
    }
}

impl ServiceBackend for WindowsServices {
    fn list(&mut self) -> Result<Vec<ServiceRecord>, ServiceError> {
        let manager = Self::manager(SC_MANAGER_ENUMERATE_SERVICE)?;
        let mut records = Vec::new();
        let mut resume: u32 = 0;
        // u64 backing keeps the entry structs pointer-aligned.
        let mut buffer: Vec<u64> = vec![0; 8 * 1024];

        loop {
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;
            let ok = unsafe {
                EnumServicesStatusExW(
                    manager.0,
                    SC_ENUM_PROCESS_INFO,
                    SERVICE_WIN32,
                    SERVICE_STATE_ALL,
                    buffer.as_mut_ptr().cast::<u8>(),
                    (buffer.len() * std::mem::size_of::<u64>()) as u32,
                    &mut needed,
                    &mut returned,
                    &mut resume,
                    std::ptr::null(),
                )
            };
            let more = ok == 0 && unsafe { GetLastError() } == ERROR_MORE_DATA;
            if ok == 0 && !more {
                return Err(service_error("service manager", "EnumServicesStatusExW"));
            }

            let entries = unsafe {
                std::slice::from_raw_parts(
                    buffer.as_ptr().cast::<ENUM_SERVICE_STATUS_PROCESSW>(),
                    returned as usize,
                )
            };
            for entry in entries {
                records.push(ServiceRecord {
                    name: unsafe { from_wide(entry.lpServiceName) },
                    status: state_label(entry.ServiceStatusProcess.dwCurrentState).to_string(),
                    display_name: unsafe { from_wide(entry.lpDisplayName) },
                });
            }

            if !more {
                break;
            }
            let wanted = (needed as usize).div_ceil(std::mem::size_of::<u64>());
            if returned == 0 {
                if wanted <= buffer.len() {
                    return Err(ServiceError::Other(
                        "service enumeration made no progress".to_string(),
                    ));
                }
                buffer.resize(wanted, 0);
            }
        }

        Ok(records)
    }

    fn start(&mut self, name: &str) -> Result<(), ServiceError> {
        let service = Self::open(name, SERVICE_START | SERVICE_QUERY_STATUS)?;
        let ok = unsafe { StartServiceW(service.0, 0, std::ptr::null()) };
        if ok == 0 {
            if unsafe { GetLastError() } == ERROR_SERVICE_ALREADY_RUNNING {
                return Ok(());
            }
            return Err(service_error(name, "StartServiceW"));
        }
        Ok(())
    }

    fn stop(&mut self, name: &str) -> Result<(), ServiceError> {
        let service = Self::open(name, SERVICE_STOP | SERVICE_QUERY_STATUS)?;
        let mut status: SERVICE_STATUS = unsafe { std::mem::zeroed() };
        let ok = unsafe { ControlService(service.0, SERVICE_CONTROL_STOP, &mut status) };
        if ok == 0 {
            if unsafe { GetLastError() } == ERROR_SERVICE_NOT_ACTIVE {
                return Ok(());
            }
            return Err(service_error(name, "ControlService"));
        }

        let deadline = Instant::now() + STOP_WAIT;
        while Self::current_state(&service, name)? != SERVICE_STOPPED {
            if Instant::now() >= deadline {
                return Err(ServiceError::Other(format!(
                    "service '{name}' did not stop within {}s",
                    STOP_WAIT.as_secs()
                )));
            }
            std::thread::sleep(STOP_POLL);
        }
        Ok(())
    }
}
