//! Neon palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint text in the status bar.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key letter in the status bar.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Large field value text.
pub fn value_style() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// Decay gauge fill: calm while low, hot as it nears the maximum.
pub fn decay_gauge(ratio: f64) -> Style {
    let color = if ratio >= 0.85 {
        ERROR_RED
    } else if ratio >= 0.5 {
        CORAL
    } else {
        NEON_CYAN
    };
    Style::default().fg(color).bg(BG_HIGHLIGHT)
}

/// Battery gauge fill: green when healthy, yellow when low, red when critical.
pub fn battery_gauge(ratio: f64) -> Style {
    let color = if ratio <= 0.15 {
        ERROR_RED
    } else if ratio <= 0.35 {
        ELECTRIC_YELLOW
    } else {
        SUCCESS_GREEN
    };
    Style::default().fg(color).bg(BG_HIGHLIGHT)
}
