use crate::system::process::ProcessRecord;
use crate::system::services::ServiceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Name,
    Pid,
    Status,
    User,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Name,
        FilterMode::Pid,
        FilterMode::Status,
        FilterMode::User,
    ];

    /// The mode after `self` in `modes`, wrapping. A mode outside `modes`
    /// moves to the first one.
    pub fn next_in(self, modes: &[FilterMode]) -> Self {
        match modes.iter().position(|m| *m == self) {
            Some(i) => modes[(i + 1) % modes.len()],
            None => modes.first().copied().unwrap_or(self),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Name => "Name",
            FilterMode::Pid => "PID",
            FilterMode::Status => "Status",
            FilterMode::User => "User",
        }
    }

    /// Unknown text falls back to `Name`.
    pub fn from_str_config(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pid" => FilterMode::Pid,
            "status" | "state" => FilterMode::Status,
            "user" | "username" => FilterMode::User,
            _ => FilterMode::Name,
        }
    }
}

pub fn matches(record: &ProcessRecord, mode: FilterMode, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    match mode {
        FilterMode::Pid => record.pid.to_string().starts_with(query),
        FilterMode::Name => contains_folded(&record.name, query),
        FilterMode::Status => contains_folded(&record.status, query),
        // Unowned rows display as "Unknown" and filter the same way.
        FilterMode::User => contains_folded(record.username_or_unknown(), query),
    }
}

/// Services have no pid or owner. The Services view only offers `Name` and
/// `Status`; the other modes fall back to the names.
pub fn matches_service(service: &ServiceRecord, mode: FilterMode, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    match mode {
        FilterMode::Status => contains_folded(&service.status, query),
        FilterMode::Name | FilterMode::Pid | FilterMode::User => {
            contains_folded(&service.name, query) || contains_folded(&service.display_name, query)
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
