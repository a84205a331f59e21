use crate::executor::PendingAction;
use crate::view::filter::FilterMode;
use crate::view::{SelectionKey, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// User intents, produced by key and mouse mapping and handled by
/// [`App::dispatch`](crate::app::App::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SwitchView(ViewId),
    NextView,
    PrevView,
    Move(Movement),
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    SetFilter {
        view: ViewId,
        mode: FilterMode,
        query: String,
    },
    CycleFilterMode,
    SortBy {
        view: ViewId,
        column: usize,
    },
    Select {
        view: ViewId,
        key: SelectionKey,
    },
    /// Asks for confirmation first when the action needs it.
    Request(PendingAction),
    Confirm,
    Cancel,
    TogglePause,
    ToggleTheme,
    ToggleHelp,
    Refresh,
    SelectAt(u16, u16),
    None,
}
