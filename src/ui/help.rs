use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::executor::PendingAction;
use crate::ui::theme::Theme;

const HELP_WIDTH: u16 = 48;
const CONFIRM_WIDTH: u16 = 50;

/// Centered key reference, one `key  description` line per binding.
pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, &str)], theme: &Theme) {
    let key_style = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!(" {key:>12} "), key_style),
                Span::styled(format!("  {desc}"), Style::default().fg(theme.pill_desc_fg)),
            ])
        })
        .collect();

    let inner_height = lines.len() as u16;
    let paragraph = Paragraph::new(lines);
    draw_dialog(
        frame,
        area,
        (HELP_WIDTH, inner_height),
        " Keybinds ",
        (theme.overlay_border, theme.accent),
        paragraph,
        theme,
    );
}

/// Yes/no dialog for an action waiting on confirmation.
pub fn render_confirm(frame: &mut Frame, area: Rect, pending: &PendingAction, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            pending.prompt(),
            Style::default()
                .fg(theme.pill_desc_fg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "[y] yes   [n] no",
            Style::default().fg(theme.text_secondary),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    draw_dialog(
        frame,
        area,
        (CONFIRM_WIDTH, 3),
        " Confirm ",
        (theme.status_err, theme.status_err),
        paragraph,
        theme,
    );
}

/// Clears a centered box, frames it and fills it with `body`.
/// `size` is (outer width, inner height); both shrink to fit `area`.
fn draw_dialog(
    frame: &mut Frame,
    area: Rect,
    size: (u16, u16),
    title: &str,
    (border, title_fg): (Color, Color),
    body: Paragraph<'_>,
    theme: &Theme,
) {
    let width = size.0.min(area.width.saturating_sub(4));
    let height = (size.1 + 2).min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(body.style(Style::default().bg(theme.surface_bg)), inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
