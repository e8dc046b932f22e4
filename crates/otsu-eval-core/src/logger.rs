//! Stderr logger for binaries and benches.
//!
//! Records print as `[elapsed LEVEL target] message`, where `target` drops the
//! crate prefix (`otsu_eval_core::pipeline` shows as `pipeline`).

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1e3;
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:9.3}ms {:>5} {}] {}",
            elapsed_ms,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Filter used when `RUST_LOG` is unset: `level` for the otsu-eval crates,
/// `warn` for everything else.
#[cfg(feature = "tracing")]
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    format!("warn,otsu_eval={level},otsu_eval_core={level}")
}

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise only this workspace logs at `level`.
/// Span close events carry stage timings, so `debug` shows per-stage
/// durations of [`crate::Pipeline::segment`]. `json` switches to one JSON
/// object per line.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
