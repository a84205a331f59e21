use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{format_bytes, format_percent};
use crate::system::snapshot::SystemSummary;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, summary: &SystemSummary, paused: bool, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_system(frame, chunks[0], summary, paused, theme);
    render_gauge(
        frame,
        chunks[1],
        " CPU ",
        summary.cpu_percent,
        format!("{:.1}%", summary.cpu_percent),
        theme,
    );
    render_gauge(
        frame,
        chunks[2],
        " RAM ",
        summary.ram_percent,
        format!(
            "{}/{} ({:.1}%)",
            format_bytes(summary.memory_used),
            format_bytes(summary.memory_total),
            summary.ram_percent
        ),
        theme,
    );
}

fn render_system(
    frame: &mut Frame,
    area: Rect,
    summary: &SystemSummary,
    paused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut title = vec![
        Span::styled(
            " taskboard ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Procs: {}", summary.process_count),
            Style::default().fg(theme.text_secondary),
        ),
    ];
    if paused {
        title.push(Span::raw("  "));
        title.push(Span::styled(
            " PAUSED ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.paused_bg)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let secondary = Style::default().fg(theme.text_secondary);
    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(
            format!(
                "{} {} | kernel {} | {}",
                summary.os_name, summary.os_version, summary.kernel_version, summary.arch
            ),
            secondary,
        )),
        Line::from(Span::styled(
            format!(
                "Disk {} | Net \u{2193}{} \u{2191}{}",
                format_percent(summary.disk_percent),
                format_bytes(summary.net_received),
                format_bytes(summary.net_transmitted)
            ),
            secondary,
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &'static str,
    percent: f32,
    label: String,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    // Gauge panics outside 0..=1, NaN included.
    let ratio = if percent.is_finite() {
        (f64::from(percent) / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}
