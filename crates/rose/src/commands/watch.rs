//! `rose watch`: repeating refresh until Ctrl-C.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use rose_core::{DisplayState, Poller, PollerConfig, StatusFields, StatusView};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

// ── LineView ─────────────────────────────────────────────────────────

/// Prints one line per completed render.
///
/// Table and plain output get a timestamped summary line; JSON formats get
/// one compact object per line; YAML gets one document per render.
pub struct LineView {
    fields: StatusFields,
    format: OutputFormat,
    color: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl LineView {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self::with_writer(format, color, Box::new(io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, color: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            fields: StatusFields::new(),
            format,
            color,
            out: Mutex::new(out),
        }
    }

    fn line(&self) -> String {
        let fields = self.fields.current();
        match self.format {
            OutputFormat::Table => output::status_line(&fields, chrono::Local::now(), self.color),
            OutputFormat::Plain => output::status_line(&fields, chrono::Local::now(), false),
            OutputFormat::Json | OutputFormat::JsonCompact => output::render_json_compact(&fields),
            OutputFormat::Yaml => format!("---\n{}", output::render_yaml(&fields).trim_end()),
        }
    }
}

impl StatusView for LineView {
    fn set_decay(&self, text: &str) {
        self.fields.set_decay(text);
    }

    fn set_battery(&self, text: &str) {
        self.fields.set_battery(text);
    }

    fn set_display(&self, state: DisplayState) {
        self.fields.set_display(state);
    }

    fn repaint_display(&self) {
        self.fields.repaint_display();
    }

    fn render_complete(&self) {
        let line = self.line();
        let mut out = self.out.lock().expect("watch output lock poisoned");
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    config: &PollerConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = match args.interval {
        Some(0) => {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => config.poll_interval,
    };

    let view = if global.quiet {
        LineView::with_writer(global.output(), false, Box::new(io::sink()))
    } else {
        LineView::new(global.output(), output::should_color(global.color()))
    };
    let poller = Poller::new(config.build_client()?, Arc::new(view), interval);

    if !global.quiet {
        eprintln!(
            "Watching {} every {} (Ctrl-C to stop)",
            config.server,
            humantime::format_duration(interval)
        );
    }

    let refresh = poller.refresh(true).await;
    if let (Err(e), false) = (&refresh.outcome, global.quiet) {
        eprintln!("warning: {e}; next reading in {}", humantime::format_duration(interval));
    }
    let Some(schedule) = refresh.schedule else {
        return Ok(());
    };

    tokio::signal::ctrl_c().await?;
    info!("interrupted, stopping refresh schedule");
    schedule.shutdown().await;
    Ok(())
}
