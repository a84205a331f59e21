use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, StatusMessage, key_label};
use crate::ui::theme::Theme;
use crate::view::ViewState;

/// Everything the bottom line depends on.
pub struct StatusLine<'a> {
    pub input_mode: &'a InputMode,
    pub view_state: &'a ViewState,
    pub filterable: bool,
    pub keybinds: &'a ResolvedKeybinds,
    pub message: Option<&'a StatusMessage>,
}

pub fn render(frame: &mut Frame, area: Rect, status: &StatusLine<'_>, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // A pending message hides the hints until it expires.
    if let Some(msg) = status.message {
        let color = if msg.is_error {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {}", msg.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let kb = status.keybinds;
    let mode = status.view_state.filter_mode.label();
    let query = status.view_state.filter_query.as_str();
    let mut pills = Pills::new(theme);

    let line = match status.input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    format!(" {mode} "),
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {query}"), Style::default().fg(theme.pill_desc_fg)),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            pills.push("Esc", "Clear");
            pills.push("Enter", "Apply");
            spans.extend(pills.spans);
            Line::from(spans)
        }
        InputMode::Confirm(_) => {
            pills.push("y", "Confirm");
            pills.push("n", "Cancel");
            Line::from(pills.spans)
        }
        _ if status.filterable && !query.is_empty() => {
            let mut spans = vec![
                Span::styled(
                    format!(" Filter ({mode}): "),
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(query.to_string(), Style::default().fg(theme.pill_desc_fg)),
            ];
            pills.push(key_label(kb.filter), "Edit");
            pills.push(key_label(kb.filter_mode), "Mode");
            spans.extend(pills.spans);
            Line::from(spans)
        }
        _ => {
            pills.push(key_label(kb.quit), "Quit");
            pills.push("Tab", "View");
            if status.filterable {
                pills.push(key_label(kb.filter), "Filter");
                pills.push(key_label(kb.filter_mode), mode);
            }
            pills.push("F1-F6", "Sort");
            pills.push(key_label(kb.pause), "Pause");
            pills.push(key_label(kb.help), "Help");
            Line::from(pills.spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

/// Key hints drawn as ` key  desc` pills.
struct Pills<'t> {
    theme: &'t Theme,
    spans: Vec<Span<'static>>,
}

impl<'t> Pills<'t> {
    fn new(theme: &'t Theme) -> Self {
        Pills {
            theme,
            spans: Vec::new(),
        }
    }

    fn push(&mut self, key: impl AsRef<str>, desc: &str) {
        let theme = self.theme;
        self.spans.push(Span::raw(" "));
        self.spans.push(Span::styled(
            format!(" {} ", key.as_ref()),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ));
        self.spans.push(Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ));
    }
}
