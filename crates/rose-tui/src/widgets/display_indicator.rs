//! Display toggle indicator: ●/○ with color mapping.

use ratatui::style::Style;
use ratatui::text::Span;

use rose_core::DisplayState;

use crate::theme;

/// Styled dot + label for the toggle value; `None` before the device has
/// reported one.
pub fn display_span(state: Option<DisplayState>) -> Span<'static> {
    let (text, color) = match state {
        Some(DisplayState::On) => ("● on", theme::SUCCESS_GREEN),
        Some(DisplayState::Off) => ("○ off", theme::DIM_WHITE),
        None => ("- unknown", theme::BORDER_GRAY),
    };
    Span::styled(text, Style::default().fg(color))
}
