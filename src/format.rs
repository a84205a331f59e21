use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::view::{Row, ViewLayout};

/// Widest a column gets in plain-text output before truncation.
const MAX_PLAIN_WIDTH: usize = 40;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_percent(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "n/a".to_string(),
    }
}

/// Renders rows as an aligned text table: header, rule, then one line per
/// row. Numeric columns are right aligned.
pub fn render_plain_table(layout: &ViewLayout, rows: &[Row]) -> String {
    let widths: Vec<usize> = layout
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|r| r.cell(i).width())
                .chain(std::iter::once(col.title.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_PLAIN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = layout.columns.iter().map(|c| c.title.to_string()).collect();
    push_line(&mut out, layout, &widths, &header);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, layout, &widths, &rule);
    for row in rows {
        push_line(&mut out, layout, &widths, &row.cells);
    }
    out
}

fn push_line(out: &mut String, layout: &ViewLayout, widths: &[usize], cells: &[String]) {
    let mut parts = Vec::with_capacity(widths.len());
    for (i, width) in widths.iter().enumerate() {
        let text = truncate_unicode(cells.get(i).map(String::as_str).unwrap_or(""), *width);
        let pad = " ".repeat(width.saturating_sub(text.width()));
        let numeric = layout.columns.get(i).is_some_and(|c| c.numeric);
        parts.push(if numeric {
            format!("{pad}{text}")
        } else {
            format!("{text}{pad}")
        });
    }
    out.push_str(parts.join("  ").trim_end());
    out.push('\n');
}
