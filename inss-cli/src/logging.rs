//! Process-wide tracing setup for the `inss-refund` binary.
//!
//! Events go to stderr so stdout stays reserved for the report. A log file
//! can be attached once configuration has been read, and the level set from
//! configuration unless `RUST_LOG` already decided it.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

const DEFAULT_DIRECTIVE: &str = "info";
const RESET: &str = "\x1b[0m";

/// One line per event: `HH:MM:SS.mmm LEVEL target fields`.
struct LineFormat;

fn level_style(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

fn painted(
    writer: &mut Writer<'_>,
    style: Option<&str>,
    text: impl Display,
) -> std::fmt::Result {
    match style {
        Some(style) => write!(writer, "{style}{text}{RESET} "),
        None => write!(writer, "{text} "),
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let colored = writer.has_ansi_escapes();
        let style = |code: &'static str| colored.then_some(code);

        painted(&mut writer, style("\x1b[2m"), Local::now().format("%H:%M:%S%.3f"))?;
        painted(&mut writer, style(level_style(meta.level())), format_args!("{:>5}", meta.level()))?;
        painted(&mut writer, style("\x1b[36m"), meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log destination that starts detached and can be pointed at a file later.
/// Writes while detached succeed and go nowhere.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn attach(&self, file: File) {
        *self.lock() = Some(file);
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

/// What the installed subscriber leaves behind for later adjustment.
struct Controls {
    level: reload::Handle<EnvFilter, Registry>,
    file: LogFile,
}

static CONTROLS: OnceLock<Controls> = OnceLock::new();

fn controls() -> Result<&'static Controls> {
    CONTROLS.get().ok_or_else(|| anyhow!("logging not yet initialized"))
}

/// True when `RUST_LOG` is set; a configured level must not replace it.
pub fn env_filter_overridden() -> bool {
    std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
}

/// Replaces the active filter. Takes a bare level such as `debug` or any
/// `EnvFilter` directive string.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log level '{directive}'"))?;
    controls()?
        .level
        .reload(filter)
        .context("filter reload failed")
}

/// Appends log output to `path` from now on, replacing any earlier file.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let controls = controls()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    controls.file.attach(file);
    Ok(())
}

/// Installs the global subscriber. Call once, before configuration is read.
/// Level defaults to `info` unless `RUST_LOG` is set.
pub fn init_default_logging() {
    let initial = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let (level_layer, level) = reload::Layer::new(initial);
    let file = LogFile::default();

    let installed = tracing_subscriber::registry()
        .with(level_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(file.clone()),
        )
        .try_init();

    if installed.is_ok() {
        let _ = CONTROLS.set(Controls { level, file });
    }
}
