use super::filter::{self, FilterMode};
use super::{Column, KeyKind, Row, ViewLayout};
use crate::system::services::ServiceRecord;

pub static LAYOUT: ViewLayout = ViewLayout {
    columns: &[
        Column::text("Name", 24),
        Column::text("Status", 12),
        Column::text("Display Name", 40),
    ],
    key_column: 0,
    key_kind: KeyKind::Name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceListing<'a> {
    /// No service manager on this platform.
    Unsupported,
    Listed(&'a [ServiceRecord]),
}

pub fn rows(listing: ServiceListing<'_>, mode: FilterMode, query: &str) -> Vec<Row> {
    match listing {
        ServiceListing::Unsupported => vec![placeholder_row()],
        ServiceListing::Listed(services) => services
            .iter()
            .filter(|s| filter::matches_service(s, mode, query))
            .map(|s| Row::new(vec![s.name.clone(), s.status.clone(), s.display_name.clone()]))
            .collect(),
    }
}

/// Empty key cell, so the row can never be selected or acted on.
fn placeholder_row() -> Row {
    Row::new(vec![
        String::new(),
        "unsupported".to_string(),
        "Services are only available on Windows".to_string(),
    ])
}
