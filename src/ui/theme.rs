use ratatui::style::Color;

use crate::domain::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub surface: Color,
    pub popup_surface: Color,
    pub accent: Color,
    pub text: Color,
    pub muted_text: Color,
    pub border: Color,
    pub focus_border: Color,
    pub available: Color,
    pub selected: Color,
    pub warning: Color,
    pub danger: Color,
    pub success: Color,
    pub rmse: Color,
    pub mae: Color,
    pub mape: Color,
}

impl Theme {
    #[must_use]
    pub fn metric_color(&self, metric: Metric) -> Color {
        match metric {
            Metric::Rmse => self.rmse,
            Metric::Mae => self.mae,
            Metric::Mape => self.mape,
        }
    }
}

pub fn detect_color_capability() -> ColorCapability {
    detect_color_capability_from(
        std::env::var("TERM").ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("NO_COLOR").ok().as_deref(),
    )
}

#[must_use]
pub fn detect_color_capability_from(
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    if no_color.is_some_and(|value| !value.is_empty())
        || term.is_some_and(|value| value.eq_ignore_ascii_case("dumb"))
    {
        return ColorCapability::Basic16;
    }
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }
    if term
        .unwrap_or_default()
        .to_lowercase()
        .contains("256color")
    {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

#[must_use]
pub fn theme_for(capability: ColorCapability) -> Theme {
    if capability == ColorCapability::Basic16 {
        return Theme {
            surface: Color::Reset,
            popup_surface: Color::Blue,
            accent: Color::Cyan,
            text: Color::White,
            muted_text: Color::Gray,
            border: Color::DarkGray,
            focus_border: Color::Cyan,
            available: Color::Green,
            selected: Color::Yellow,
            warning: Color::Yellow,
            danger: Color::LightRed,
            success: Color::Green,
            rmse: Color::Cyan,
            mae: Color::Magenta,
            mape: Color::Yellow,
        };
    }

    Theme {
        surface: Color::Rgb(17, 22, 33),
        popup_surface: Color::Rgb(28, 36, 54),
        accent: Color::Rgb(102, 232, 242),
        text: Color::Rgb(226, 232, 240),
        muted_text: Color::Rgb(128, 140, 160),
        border: Color::Rgb(62, 74, 96),
        focus_border: Color::Rgb(102, 232, 242),
        available: Color::Rgb(134, 214, 140),
        selected: Color::Rgb(255, 215, 117),
        warning: Color::Rgb(255, 196, 87),
        danger: Color::Rgb(255, 107, 107),
        success: Color::Rgb(134, 214, 140),
        rmse: Color::Rgb(102, 232, 242),
        mae: Color::Rgb(189, 147, 249),
        mape: Color::Rgb(255, 215, 117),
    }
}
