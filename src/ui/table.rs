use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row as TableRow, Table, TableState, Tabs};

use crate::app::TableGeometry;
use crate::surface::RenderedTable;
use crate::ui::theme::Theme;
use crate::view::sort::{SortState, coerce_numeric};
use crate::view::ViewId;

const COLUMN_SPACING: u16 = 1;

pub fn render_tabs(frame: &mut Frame, area: Rect, active: ViewId, theme: &Theme) {
    let titles = ViewId::ALL
        .iter()
        .map(|view| format!(" {} {} ", view.index() + 1, view.title()));
    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("|", Style::default().fg(theme.overlay_border)));
    frame.render_widget(tabs, area);
}

/// Draws the active view's table and returns where everything landed.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: ViewId,
    table: &RenderedTable,
    sort: &SortState,
    offset: usize,
    theme: &Theme,
) -> TableGeometry {
    let layout = view.layout();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" {} ({}) ", view.title(), table.rows.len()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);

    let widths: Vec<Constraint> = layout
        .columns
        .iter()
        .map(|c| Constraint::Fill(c.width))
        .collect();

    let header_style = Style::default()
        .fg(theme.table_header_fg)
        .add_modifier(Modifier::BOLD);
    let header = TableRow::new(layout.columns.iter().enumerate().map(|(i, col)| {
        let indicator = match (sort.column, sort.ascending) {
            (Some(c), true) if c == i => " \u{25b2}",
            (Some(c), false) if c == i => " \u{25bc}",
            _ => "",
        };
        aligned(format!("{}{indicator}", col.title), col.numeric)
    }))
    .style(header_style);

    let body = table.rows.iter().map(|row| {
        TableRow::new(layout.columns.iter().enumerate().map(|(i, col)| {
            let text = row.cell(i);
            let cell = aligned(text.to_string(), col.numeric);
            if col.title.starts_with("CPU") {
                cell.style(Style::default().fg(theme.heat(coerce_numeric(text))))
            } else {
                cell.style(Style::default().fg(theme.text_primary))
            }
        }))
    });

    let widget = Table::new(body, widths.clone())
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .row_highlight_style(
            Style::default()
                .fg(theme.row_highlight_fg)
                .bg(theme.row_highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default()
        .with_offset(offset)
        .with_selected(table.selected);
    frame.render_stateful_widget(widget, area, &mut state);

    let header_rect = Rect {
        height: inner.height.min(1),
        ..inner
    };
    let body_rect = Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let columns = Layout::horizontal(widths)
        .spacing(COLUMN_SPACING)
        .split(header_rect)
        .to_vec();

    TableGeometry {
        header: Some(header_rect),
        body: Some(body_rect),
        columns,
        offset: state.offset(),
    }
}

fn aligned(text: String, numeric: bool) -> Cell<'static> {
    let line = Line::from(text);
    if numeric {
        Cell::from(line.alignment(Alignment::Right))
    } else {
        Cell::from(line)
    }
}
