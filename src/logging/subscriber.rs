//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Map an event to its `[LEVEL]` label and ANSI color.
fn level_label(level: tracing::Level, target: &str) -> (&'static str, &'static str) {
    match (level, target) {
        (tracing::Level::ERROR, _) => ("ERROR", "\x1b[31m"),
        (tracing::Level::WARN, _) => ("WARN ", "\x1b[33m"),
        (tracing::Level::INFO, "xake::mark") => ("MARK ", "\x1b[1;37m"),
        (tracing::Level::INFO, "xake::trace") => ("TRACE", "\x1b[35m"),
        (tracing::Level::INFO, _) => ("INFO ", "\x1b[36m"),
        _ => ("DEBUG", "\x1b[32m"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open (or create) the log file for `command`, write a run header, and
    /// return a new `FileLayer` ready to receive events.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("XAKE_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "==========================================\n\
             xake {version} {command} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_utc_time();
        let (label, _) = level_label(*metadata.level(), target);

        let line = if target == "xake::dry_run" {
            format!("[{ts}] [{label}] [dry run] {msg}")
        } else {
            format!("[{ts}] [{label}] {msg}")
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits `[LEVEL] message`
/// console lines.
struct XakeFormatter {
    ansi: bool,
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for XakeFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let target = metadata.target();
        // Progress lines are drawn by the logger itself.
        if target == "xake::progress" {
            return Ok(());
        }

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let (label, color) = level_label(*metadata.level(), target);
        let dry_run = if target == "xake::dry_run" {
            "\x1b[33m[dry run]\x1b[0m "
        } else {
            ""
        };
        let line = format!("{color}[{label}]\x1b[0m {dry_run}{}", extractor.message);

        if self.ansi {
            writeln!(writer, "{line}")
        } else {
            writeln!(writer, "{}", strip_ansi(&line))
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output shows `TRACE` and above (`DEBUG` too when `verbose`), with
/// warnings and errors on stderr. The file layer writes every event to
/// `$XDG_CACHE_HOME/xake/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str, ansi: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(XakeFormatter { ansi })
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
