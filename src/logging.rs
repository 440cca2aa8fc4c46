use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogOptions<'a> {
    /// Directory for the daily-rotated log files (created if missing)
    pub log_dir: &'a Utf8Path,
    /// File name prefix, e.g. "pictor" → `pictor.2026-10-18`
    pub prefix: &'a str,
    /// `debug` level instead of `info`
    pub debug: bool,
    /// Mirror log lines to stderr with ANSI colors
    pub console: bool,
}

/// Install the global tracing subscriber.
///
/// Writes to a daily-rotating file through a non-blocking appender. The
/// returned guard flushes pending lines on drop and must be held until exit.
pub fn init_logging(options: &LogOptions<'_>) -> Result<WorkerGuard> {
    ensure_log_dir(options.log_dir)?;

    let file_appender = rolling::daily(options.log_dir, options.prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Console output goes to stderr so it never interleaves with results on stdout
    let console_layer = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(level_filter(options.debug))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        options.log_dir,
        options.prefix,
        options.debug,
        options.console
    );

    Ok(guard)
}

/// `RUST_LOG` wins when set; otherwise `debug` or `info` per the flag.
fn level_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

fn ensure_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}
