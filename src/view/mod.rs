//! Table projections of a snapshot.
//!
//! Everything here is pure: the same snapshot, filter and sort state always
//! produce the same rows. Nothing in this module talks to the OS or the
//! terminal.

pub mod detail;
pub mod filter;
pub mod process;
pub mod selection;
pub mod service;
pub mod sort;
pub mod user;

use std::fmt;

use crate::system::snapshot::Snapshot;
use filter::FilterMode;
use service::ServiceListing;
use sort::SortState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Processes,
    Users,
    Details,
    Services,
}

impl ViewId {
    pub const ALL: [ViewId; 4] = [
        ViewId::Processes,
        ViewId::Users,
        ViewId::Details,
        ViewId::Services,
    ];

    pub fn index(self) -> usize {
        match self {
            ViewId::Processes => 0,
            ViewId::Users => 1,
            ViewId::Details => 2,
            ViewId::Services => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewId::Processes => "Processes",
            ViewId::Users => "Users",
            ViewId::Details => "Details",
            ViewId::Services => "Services",
        }
    }

    pub fn next(self) -> Self {
        ViewId::ALL[(self.index() + 1) % ViewId::ALL.len()]
    }

    pub fn prev(self) -> Self {
        ViewId::ALL[(self.index() + ViewId::ALL.len() - 1) % ViewId::ALL.len()]
    }

    pub fn layout(self) -> &'static ViewLayout {
        match self {
            ViewId::Processes => &process::LAYOUT,
            ViewId::Users => &user::LAYOUT,
            ViewId::Details => &detail::LAYOUT,
            ViewId::Services => &service::LAYOUT,
        }
    }

    /// Whether the process filter narrows this view.
    pub fn is_filterable(self) -> bool {
        !matches!(self, ViewId::Users)
    }

    /// Filter modes that mean something for this view's rows.
    pub fn filter_modes(self) -> &'static [FilterMode] {
        match self {
            ViewId::Services => &[FilterMode::Name, FilterMode::Status],
            _ => &FilterMode::ALL,
        }
    }

    /// `mode` if this view supports it, `Name` otherwise.
    pub fn supported_filter_mode(self, mode: FilterMode) -> FilterMode {
        if self.filter_modes().contains(&mode) {
            mode
        } else {
            FilterMode::Name
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => ViewId::Users,
            "details" | "detail" => ViewId::Details,
            "services" | "service" => ViewId::Services,
            _ => ViewId::Processes,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub numeric: bool,
    /// Relative width hint for the table layout.
    pub width: u16,
}

impl Column {
    pub const fn text(title: &'static str, width: u16) -> Self {
        Column {
            title,
            numeric: false,
            width,
        }
    }

    pub const fn number(title: &'static str, width: u16) -> Self {
        Column {
            title,
            numeric: true,
            width,
        }
    }
}

/// How the selection key is read back out of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Pid,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    pub columns: &'static [Column],
    pub key_column: usize,
    pub key_kind: KeyKind,
}

/// One materialized table row, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Row { cells }
    }

    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Stable identity of a row across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    Pid(u32),
    Name(String),
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKey::Pid(pid) => write!(f, "PID {pid}"),
            SelectionKey::Name(name) => f.write_str(name),
        }
    }
}

/// Interactive state of one view, owned by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub filter_mode: FilterMode,
    pub filter_query: String,
    pub sort: SortState,
    pub selected: Option<SelectionKey>,
}

impl ViewState {
    pub fn with_filter_mode(filter_mode: FilterMode) -> Self {
        ViewState {
            filter_mode,
            ..ViewState::default()
        }
    }
}

/// Everything the aggregators read during one tick.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub snapshot: &'a Snapshot,
    pub cpu_count: usize,
    pub services: ServiceListing<'a>,
}

/// Rows for `view`, filtered and sorted by `state`.
///
/// The stored sort is applied on every call, so a periodic refresh never
/// drops back to enumeration order.
pub fn build_rows(view: ViewId, input: &ViewInput<'_>, state: &ViewState) -> Vec<Row> {
    let _span = tracing::debug_span!("view.build_rows", view = view.title()).entered();

    let mut rows = match view {
        ViewId::Processes => process::rows(input.snapshot, state.filter_mode, &state.filter_query),
        ViewId::Details => detail::rows(input.snapshot, state.filter_mode, &state.filter_query),
        ViewId::Users => user::rows(input.snapshot, input.cpu_count),
        ViewId::Services => service::rows(input.services, state.filter_mode, &state.filter_query),
    };
    state.sort.apply(&mut rows, view.layout());
    rows
}
