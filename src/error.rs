use thiserror::Error;

/// Failure of a whole enumeration call. Degrades to an empty snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("process enumeration failed: {0}")]
    Enumeration(String),
}

/// Failure of a single signal or handle operation against one process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("process {0} not found")]
    NotFound(u32),

    #[error("access denied for process {0}")]
    AccessDenied(u32),

    #[error("{0}")]
    Other(String),
}

/// Failure talking to the service manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service control is not supported on this platform")]
    Unsupported,

    #[error("service '{0}' not found")]
    NotFound(String),

    #[error("access denied for service '{0}'")]
    AccessDenied(String),

    #[error("{0}")]
    Other(String),
}

/// User-visible failure of an action. Never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Permission denied for {target}: run taskboard with elevated privileges (administrator/root)")]
    AccessDenied { target: String },

    #[error("Failed to {verb} {target}: {detail}")]
    Failed {
        verb: &'static str,
        target: String,
        detail: String,
    },
}

impl ActionError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ActionError::AccessDenied { .. })
    }
}
