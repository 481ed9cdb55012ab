use std::env;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONSOLE_LEVEL: &str = "info";
const DEFAULT_FILE_LEVEL: &str = "debug";
const DEFAULT_LOG_FILE: &str = "./logs/srcflat.log";

/// Console output follows `TRACING_LEVEL`; the log file follows
/// `FILE_TRACING_LEVEL` so per-file detail can be kept off the terminal.
pub fn init_logger() -> impl Drop {
    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let file_appender = tracing_appender::rolling::never("./", log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .without_time()
        .with_ansi(true)
        .with_filter(level_filter("TRACING_LEVEL", DEFAULT_CONSOLE_LEVEL));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(level_filter("FILE_TRACING_LEVEL", DEFAULT_FILE_LEVEL));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    debug!("Tracing is configured for stderr and file logging.");

    guard
}

fn level_filter(var: &str, default: &str) -> EnvFilter {
    let directives = env::var(var).unwrap_or_else(|_| default.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid {}={:?}: {}", var, directives, err);
        EnvFilter::new(default)
    })
}
