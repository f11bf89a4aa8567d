//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits bare values.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use rose_core::{DisplayState, RenderedStatus};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Display toggle value, green when on.
pub fn display_label(state: Option<DisplayState>, color: bool) -> String {
    match (state, color) {
        (None, _) => "-".into(),
        (Some(s), false) => s.to_string(),
        (Some(DisplayState::On), true) => "on".green().to_string(),
        (Some(DisplayState::Off), true) => "off".dimmed().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`; plain uses `plain_fn`.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Status rendering ─────────────────────────────────────────────────

/// Render the display fields after a refresh.
pub fn render_status(format: OutputFormat, fields: &RenderedStatus, color: bool) -> String {
    render_single(
        format,
        fields,
        |f| status_detail(f, color),
        |f| {
            let mut lines = vec![f.decay.clone(), f.battery.clone()];
            if let Some(state) = f.display {
                lines.push(state.to_string());
            }
            lines.join("\n")
        },
    )
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn status_detail(fields: &RenderedStatus, color: bool) -> String {
    let mut rows = vec![
        FieldRow {
            field: "Decay",
            value: fields.decay.clone(),
        },
        FieldRow {
            field: "Battery",
            value: fields.battery.clone(),
        },
    ];
    if fields.display.is_some() {
        rows.push(FieldRow {
            field: "Display",
            value: display_label(fields.display, color),
        });
    }
    render_table(&rows)
}

/// One line per render in watch mode: `HH:MM:SS  decay 3/14  battery 76%  display on`.
pub fn status_line(fields: &RenderedStatus, at: chrono::DateTime<chrono::Local>, color: bool) -> String {
    let stamp = at.format("%H:%M:%S").to_string();
    let stamp = if color { stamp.dimmed().to_string() } else { stamp };
    let mut line = format!("{stamp}  decay {}  battery {}", fields.decay, fields.battery);
    if fields.display.is_some() {
        line.push_str("  display ");
        line.push_str(&display_label(fields.display, color));
    }
    line
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fields(display: Option<DisplayState>) -> RenderedStatus {
        RenderedStatus {
            decay: "12/20".into(),
            battery: "87%".into(),
            display,
            repaints: 0,
        }
    }

    #[test]
    fn plain_status_is_one_value_per_line() {
        let out = render_status(OutputFormat::Plain, &fields(Some(DisplayState::On)), false);
        assert_eq!(out, "12/20\n87%\non");
    }

    #[test]
    fn json_status_omits_missing_display() {
        let out = render_status(OutputFormat::JsonCompact, &fields(None), false);
        assert_eq!(out, r#"{"decay":"12/20","battery":"87%"}"#);
    }

    #[test]
    fn table_status_lists_fields() {
        let out = render_status(OutputFormat::Table, &fields(Some(DisplayState::Off)), false);
        assert!(out.contains("Decay"));
        assert!(out.contains("12/20"));
        assert!(out.contains("off"));
    }

    #[test]
    fn watch_line_without_color() {
        let at = chrono::Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).single().unwrap();
        assert_eq!(
            status_line(&fields(Some(DisplayState::On)), at, false),
            "09:30:05  decay 12/20  battery 87%  display on"
        );
        assert_eq!(
            status_line(&fields(None), at, false),
            "09:30:05  decay 12/20  battery 87%"
        );
    }
}
