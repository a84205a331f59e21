use crate::error::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRecord {
    pub name: String,
    pub status: String,
    pub display_name: String,
}

/// Service manager operations. Only called when
/// [`Capabilities::services`](super::platform::Capabilities) is set.
pub trait ServiceBackend {
    fn list(&mut self) -> Result<Vec<ServiceRecord>, ServiceError>;
    fn start(&mut self, name: &str) -> Result<(), ServiceError>;
    /// Returns once the service reports stopped or the stop wait elapses.
    fn stop(&mut self, name: &str) -> Result<(), ServiceError>;
}

/// Backend for platforms without a service manager we drive.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedServices;

impl ServiceBackend for UnsupportedServices {
    fn list(&mut self) -> Result<Vec<ServiceRecord>, ServiceError> {
        Err(ServiceError::Unsupported)
    }

    fn start(&mut self, _name: &str) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported)
    }

    fn stop(&mut self, _name: &str) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported)
    }
}
