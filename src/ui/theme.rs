use ratatui::style::Color;

use crate::state::ThemeKind;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub table_header_fg: Color,
    pub row_highlight_bg: Color,
    pub row_highlight_fg: Color,
    pub paused_bg: Color,
    /// Idle, busy, saturated.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            table_header_fg: Color::Rgb(103, 232, 249),
            row_highlight_bg: Color::Rgb(49, 50, 68),
            row_highlight_fg: Color::White,
            paused_bg: Color::Rgb(249, 115, 22),
            heat_colors: [
                Color::Rgb(148, 163, 184),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            status_ok: Color::Rgb(0, 120, 0),
            status_err: Color::Red,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Blue,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            table_header_fg: Color::Rgb(0, 70, 140),
            row_highlight_bg: Color::Rgb(190, 210, 235),
            row_highlight_fg: Color::Black,
            paused_bg: Color::Rgb(220, 120, 80),
            heat_colors: [
                Color::Rgb(90, 90, 90),
                Color::Rgb(200, 120, 0),
                Color::Rgb(200, 60, 60),
            ],
        }
    }

    /// Color for a usage percentage cell.
    pub fn heat(&self, percent: f64) -> Color {
        if percent >= 50.0 {
            self.heat_colors[2]
        } else if percent >= 10.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }
}
