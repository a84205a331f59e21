/// One process as seen by a single snapshot.
///
/// Records are rebuilt on every collection. A `pid` is only unique within
/// the snapshot that produced it; the OS may hand the same number to an
/// unrelated process later.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub memory_bytes: u64,
    pub status: String,
    pub username: Option<String>,
}

impl ProcessRecord {
    pub fn username_or_unknown(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_USER,
        }
    }
}

/// Group key for processes whose owner could not be read.
pub const UNKNOWN_USER: &str = "Unknown";

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: Option<&str>) -> ProcessRecord {
        ProcessRecord {
            pid: 1,
            name: "init".into(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_bytes: 0,
            status: "Sleeping".into(),
            username: username.map(str::to_string),
        }
    }

    #[test]
    fn missing_or_empty_username_is_unknown() {
        assert_eq!(record(None).username_or_unknown(), "Unknown");
        assert_eq!(record(Some("")).username_or_unknown(), "Unknown");
        assert_eq!(record(Some("root")).username_or_unknown(), "root");
    }
}
