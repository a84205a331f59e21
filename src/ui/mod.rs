pub mod header;
pub mod help;
pub mod statusbar;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, InputMode};
use crate::ui::theme::Theme;

pub fn draw<P, S>(frame: &mut Frame, app: &mut App<P, S>) {
    let theme = Theme::for_kind(app.theme());
    let view = app.active_view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        app.screen.summary(),
        !app.state.auto_update(),
        &theme,
    );
    table::render_tabs(frame, chunks[1], view, &theme);

    let view_state = app.state.view(view);
    let geometry = table::render(
        frame,
        chunks[2],
        view,
        app.screen.table(view),
        &view_state.sort,
        app.table.offset,
        &theme,
    );
    app.table = geometry;

    let status = statusbar::StatusLine {
        input_mode: &app.input_mode,
        view_state: app.state.view(view),
        filterable: view.is_filterable(),
        keybinds: &app.keybinds,
        message: app.status_message.as_ref(),
    };
    statusbar::render(frame, chunks[3], &status, &theme);

    // Overlays last so they sit on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &theme);
    }
    if let InputMode::Confirm(pending) = &app.input_mode {
        help::render_confirm(frame, frame.area(), pending, &theme);
    }
}
