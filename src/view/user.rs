use std::collections::HashMap;

use super::{Column, KeyKind, Row, ViewLayout};
use crate::system::snapshot::Snapshot;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Shown for per-user disk and network usage, which is not measured.
pub const UNAVAILABLE: &str = "unavailable";

pub static LAYOUT: ViewLayout = ViewLayout {
    columns: &[
        Column::text("User", 18),
        Column::number("Processes", 10),
        Column::number("CPU %", 8),
        Column::number("Memory (MB)", 12),
        Column::text("Disk", 12),
        Column::text("Network", 12),
    ],
    key_column: 0,
    key_kind: KeyKind::Name,
};

#[derive(Debug, Clone, PartialEq)]
pub struct UserAggregate {
    pub username: String,
    pub process_count: usize,
    /// Share of total machine capacity, already divided by the core count.
    pub cpu_percent_total: f32,
    pub memory_mb_total: f64,
}

/// Groups every process by owner, in order of first appearance.
///
/// The process filter does not apply here: this is a rollup of the whole
/// machine.
pub fn aggregate(snapshot: &Snapshot, cpu_count: usize) -> Vec<UserAggregate> {
    let cores = cpu_count.max(1) as f32;
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (usize, f32, u64)> = HashMap::new();

    for process in &snapshot.processes {
        let name = process.username_or_unknown();
        let entry = totals.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            (0, 0.0, 0)
        });
        entry.0 += 1;
        entry.1 += process.cpu_percent;
        entry.2 += process.memory_bytes;
    }

    order
        .into_iter()
        .filter_map(|username| {
            let (count, cpu, memory) = totals.remove(&username)?;
            Some(UserAggregate {
                username,
                process_count: count,
                cpu_percent_total: (cpu / cores).clamp(0.0, 100.0),
                memory_mb_total: memory as f64 / BYTES_PER_MB,
            })
        })
        .collect()
}

pub fn rows(snapshot: &Snapshot, cpu_count: usize) -> Vec<Row> {
    aggregate(snapshot, cpu_count)
        .into_iter()
        .map(|agg| {
            Row::new(vec![
                agg.username,
                agg.process_count.to_string(),
                format!("{:.1}%", agg.cpu_percent_total),
                format!("{:.1}", agg.memory_mb_total),
                UNAVAILABLE.to_string(),
                UNAVAILABLE.to_string(),
            ])
        })
        .collect()
}
