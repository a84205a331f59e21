use super::filter::{self, FilterMode};
use super::{Column, KeyKind, Row, ViewLayout};
use crate::system::snapshot::Snapshot;

pub static LAYOUT: ViewLayout = ViewLayout {
    columns: &[
        Column::number("PID", 8),
        Column::text("Name", 30),
        Column::number("CPU %", 8),
        Column::number("RAM %", 8),
    ],
    key_column: 0,
    key_kind: KeyKind::Pid,
};

/// `(pid, name, cpu 1dp, memory % 2dp)` in snapshot order.
pub fn rows(snapshot: &Snapshot, mode: FilterMode, query: &str) -> Vec<Row> {
    snapshot
        .processes
        .iter()
        .filter(|p| filter::matches(p, mode, query))
        .map(|p| {
            Row::new(vec![
                p.pid.to_string(),
                p.name.clone(),
                format!("{:.1}", p.cpu_percent),
                format!("{:.2}", p.memory_percent),
            ])
        })
        .collect()
}
