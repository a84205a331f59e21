use std::collections::HashSet;
use std::hash::Hash;

use sysinfo::{
    Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind, Uid, UpdateKind,
    Users,
};

use super::process::ProcessRecord;
use super::snapshot::{Snapshot, SystemSummary};
use crate::error::SourceError;

/// Where snapshots and the system summary come from.
pub trait ProcessSource {
    /// Enumerate every readable process.
    fn collect(&mut self) -> Result<Snapshot, SourceError>;

    /// Whole-system CPU/RAM figures. Independent of `collect`.
    fn summary(&mut self) -> Result<SystemSummary, SourceError>;

    /// Logical cores, fixed for the lifetime of the source. Never zero.
    fn cpu_count(&self) -> usize;
}

pub struct Collector {
    sys: System,
    users: Users,
    /// Owners the user list could not name after its last reload.
    unresolved_uids: HashSet<Uid>,
    cpu_count: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Builds the collector and takes the priming samples.
    ///
    /// CPU usage is a delta between two refreshes, so this blocks for
    /// `MINIMUM_CPU_UPDATE_INTERVAL` to make the first summary meaningful.
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh_kind());
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();

        let cpu_count = match sys.cpus().len() {
            0 => {
                tracing::warn!("OS did not report a CPU count, assuming 1");
                1
            }
            n => n,
        };

        Collector {
            sys,
            users: Users::new_with_refreshed_list(),
            unresolved_uids: HashSet::new(),
            cpu_count,
        }
    }

    pub(crate) fn system_mut(&mut self) -> &mut System {
        &mut self.sys
    }

    /// Reloads the user list only when a process shows up whose owner it
    /// cannot name and that has not already been tried.
    fn refresh_users_if_needed(&mut self) {
        let users = &self.users;
        let unknown = self
            .sys
            .processes()
            .values()
            .filter_map(|process| process.user_id())
            .filter(|uid| users.get_user_by_id(uid).is_none())
            .cloned();
        if record_new_misses(&mut self.unresolved_uids, unknown) {
            self.users.refresh();
            let users = &self.users;
            self.unresolved_uids
                .retain(|uid| users.get_user_by_id(uid).is_none());
            tracing::debug!(users = self.users.list().len(), "reloaded user list");
        }
    }

    fn build_snapshot(&self) -> Snapshot {
        let users = &self.users;
        let _span = tracing::debug_span!("collector.build_snapshot").entered();

        let total_memory = self.sys.total_memory();
        let mut processes = Vec::with_capacity(self.sys.processes().len());

        for (pid, process) in self.sys.processes() {
            // Linux exposes threads as tasks; they are not processes of their own.
            if matches!(process.thread_kind(), Some(ThreadKind::Userland)) {
                continue;
            }

            let memory_bytes = process.memory();
            let memory_percent = if total_memory > 0 {
                (memory_bytes as f64 / total_memory as f64 * 100.0) as f32
            } else {
                0.0
            };
            let username = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_string());

            processes.push(ProcessRecord {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().to_string(),
                cpu_percent: process.cpu_usage(),
                memory_percent,
                memory_bytes,
                status: process.status().to_string(),
                username,
            });
        }

        Snapshot::new(processes)
    }
}

/// Adds `misses` to `seen`; true when at least one was not there yet.
fn record_new_misses<T: Eq + Hash>(seen: &mut HashSet<T>, misses: impl IntoIterator<Item = T>) -> bool {
    let mut grew = false;
    for miss in misses {
        grew |= seen.insert(miss);
    }
    grew
}

fn process_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_memory()
        .with_cpu()
        .with_user(UpdateKind::OnlyIfNotSet)
}

impl ProcessSource for Collector {
    fn collect(&mut self) -> Result<Snapshot, SourceError> {
        let _span = tracing::debug_span!("collector.collect").entered();

        self.sys.refresh_memory();
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh_kind());

        // At least this process is always visible, so an empty table means the
        // enumeration itself failed.
        if self.sys.processes().is_empty() {
            return Err(SourceError::Enumeration(
                "no processes visible to this user".to_string(),
            ));
        }

        self.refresh_users_if_needed();
        let snapshot = self.build_snapshot();
        tracing::debug!(processes = snapshot.len(), "collected snapshot");
        Ok(snapshot)
    }

    fn summary(&mut self) -> Result<SystemSummary, SourceError> {
        let _span = tracing::debug_span!("collector.summary").entered();

        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let memory_total = self.sys.total_memory();
        let memory_used = self.sys.used_memory();
        let ram_percent = if memory_total > 0 {
            (memory_used as f64 / memory_total as f64 * 100.0) as f32
        } else {
            0.0
        };

        let disks = Disks::new_with_refreshed_list();
        let (disk_total, disk_available) = disks
            .list()
            .iter()
            .fold((0u64, 0u64), |(total, available), disk| {
                (total + disk.total_space(), available + disk.available_space())
            });
        let disk_percent = (disk_total > 0).then(|| {
            (disk_total.saturating_sub(disk_available) as f64 / disk_total as f64 * 100.0) as f32
        });

        let networks = Networks::new_with_refreshed_list();
        let (net_received, net_transmitted) = networks
            .list()
            .values()
            .fold((0u64, 0u64), |(rx, tx), data| {
                (rx + data.total_received(), tx + data.total_transmitted())
            });

        Ok(SystemSummary {
            cpu_percent: self.sys.global_cpu_usage(),
            ram_percent,
            memory_used,
            memory_total,
            disk_percent,
            net_received,
            net_transmitted,
            os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_default(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            arch: std::env::consts::ARCH.to_string(),
            // Filled from the snapshot by the scheduler.
            process_count: 0,
        })
    }

    fn cpu_count(&self) -> usize {
        self.cpu_count
    }
}
