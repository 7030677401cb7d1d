//! Stderr logging for the dock-targets tools.
//!
//! Library code only emits through `log`. The CLI installs one backend at
//! startup: [`init_with_level`] prints `LEVEL module: message` lines, and
//! [`init_tracing`] (feature `tracing`) installs a `tracing-subscriber`
//! formatter. Both take the same level filter.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

struct StderrLogger {
    level: LevelFilter,
}

/// Last path segment of a log target, e.g. `resolve` for
/// `dock_targets_marker::resolve`.
fn module_name(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("{level:>5} {}: {args}", module_name(target))
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_line(record.level(), record.target(), record.args());
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// The first call wins; later calls are no-ops and keep the original level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger { level });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directive used when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
fn default_directive(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install a `tracing-subscriber` formatter on stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise `level` applies to every
/// target. Span close events are printed so instrumented runs show timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .try_init();
}
