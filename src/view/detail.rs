use super::filter::{self, FilterMode};
use super::{Column, KeyKind, Row, ViewLayout};
use crate::system::snapshot::Snapshot;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub static LAYOUT: ViewLayout = ViewLayout {
    columns: &[
        Column::text("Name", 24),
        Column::number("PID", 8),
        Column::text("Status", 10),
        Column::text("User", 14),
        Column::number("CPU %", 8),
        Column::number("Memory (MB)", 12),
    ],
    key_column: 1,
    key_kind: KeyKind::Pid,
};

pub fn rows(snapshot: &Snapshot, mode: FilterMode, query: &str) -> Vec<Row> {
    snapshot
        .processes
        .iter()
        .filter(|p| filter::matches(p, mode, query))
        .map(|p| {
            Row::new(vec![
                p.name.clone(),
                p.pid.to_string(),
                p.status.clone(),
                p.username_or_unknown().to_string(),
                format!("{:.1}", p.cpu_percent),
                format!("{:.1}", p.memory_bytes as f64 / BYTES_PER_MB),
            ])
        })
        .collect()
}
