use std::sync::Arc;

use super::process::ProcessRecord;

/// Processes in OS enumeration order. The order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub processes: Vec<ProcessRecord>,
}

impl Snapshot {
    pub fn new(processes: Vec<ProcessRecord>) -> Self {
        Snapshot { processes }
    }

    pub fn empty() -> Self {
        Snapshot::default()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

/// Most recent snapshot, swapped whole on refresh.
///
/// Readers clone the `Arc` and keep a consistent view for the rest of the
/// tick even if a refresh replaces the cache meanwhile.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: Arc<Snapshot>,
    generation: u64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        SnapshotCache::default()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn replace(&mut self, snapshot: Snapshot) {
        self.current = Arc::new(snapshot);
        self.generation += 1;
    }

    /// Number of replacements so far. Unchanged while paused.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whole-system figures shown above the tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemSummary {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disk_percent: Option<f32>,
    pub net_received: u64,
    pub net_transmitted: u64,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub arch: String,
    pub process_count: usize,
}
