//! Logging Module
//!
//! Sets up `tracing` with a daily-rolling JSON log file, bridges the `log`
//! facade into it, and installs the miette report hook.
//!
//! The TUI owns the terminal, so interactive sessions log to the file only.
//! One-shot CLI commands add a compact stderr layer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use is_terminal::IsTerminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "thesaurus.log";

/// Where log output goes besides the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// File only; the terminal belongs to ratatui.
    Tui,
    /// File plus stderr.
    Cli,
}

/// Directory holding the log files under `data_dir`.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Build the filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered lines are flushed on shutdown.
pub fn init(data_dir: &Path, default_level: &str, target: LogTarget) -> WorkerGuard {
    let log_dir = log_dir(data_dir);
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter(default_level));

    let stderr_layer = match target {
        LogTarget::Tui => None,
        LogTarget::Cli => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .compact()
                .with_target(false)
                .with_filter(env_filter("warn")),
        ),
    };

    // A second init (tests) keeps the first subscriber.
    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
        return guard;
    }

    // try_init may already have bridged `log`; either way the facade is routed.
    tracing_log::LogTracer::init().ok();

    init_miette();

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}

fn init_miette() {
    let colorize = io::stderr().is_terminal();
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(2)
                .break_words(true)
                .color(colorize)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}
