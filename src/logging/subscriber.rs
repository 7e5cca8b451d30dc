//! Tracing subscriber: coloured console output plus a per-command log file.
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// How a [`Log`](super::Log) call is rendered, recovered from an event's
/// level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(event: &Event<'_>) -> Self {
        let meta = event.metadata();
        match (*meta.level(), meta.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, "dotfiles::stage") => Self::Stage,
            (Level::INFO, "dotfiles::dry_run") => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }
}

fn message(event: &Event<'_>) -> String {
    struct Message(String);

    impl Visit for Message {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    let mut visitor = Message(String::new());
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event to `<cache>/dotfiles/<command>.log`, timestamped and
/// without colour codes.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Log file layer for `command` in the user cache directory, or `None`
    /// when the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::open(&log_file_path(command)?, command)
    }

    /// Truncate `path` and start it with a one-line run header.
    pub(super) fn open(path: &Path, command: &str) -> Option<Self> {
        let version =
            option_env!("DOTFILES_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        fs::write(
            path,
            format!("# dotfiles {version} {command} {}\n", format_utc_datetime()),
        )
        .ok()?;
        let file = OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let msg = strip_ansi(&message(event));
        let tag = match Kind::of(event) {
            Kind::Stage => "==> ",
            Kind::DryRun => "    [dry run] ",
            Kind::Info => "    ",
            Kind::Debug => "    [debug] ",
            Kind::Warn => "    [warn] ",
            Kind::Error => "    [error] ",
        };
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {tag}{msg}", format_utc_time()).ok();
        }
    }
}

struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = message(event);
        match Kind::of(event) {
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
            Kind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
        }
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. The console
/// shows debug events only with `verbose`; the log file for `command`
/// always records them. Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(console_level);
    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
