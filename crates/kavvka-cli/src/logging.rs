use chrono::Local;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file for this run: `<log_dir>/<app>/<date>/<hour>/<minute><second>.log`.
fn log_file_location(app_name: &str) -> (PathBuf, String) {
    let log_dir = env::var("KAVVKA_LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
    let now = Local::now();
    let dir = PathBuf::from(log_dir)
        .join(app_name)
        .join(now.format("%Y-%m-%d").to_string())
        .join(now.format("%H").to_string());
    (dir, format!("{}.log", now.format("%M%S")))
}

/// Stdout and file logging. While prompting, stdout only carries warnings
/// so the prompts stay readable; the file always gets everything that
/// passes `TRACING_LEVEL`.
pub fn init_logger(app_name: &str, interactive: bool) -> impl Drop {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let (log_dir, log_file) = log_file_location(app_name);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_level = if interactive {
        LevelFilter::WARN
    } else {
        LevelFilter::TRACE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .compact()
                .with_target(false)
                .without_time()
                .with_ansi(true)
                .with_filter(stdout_level),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(filter_layer)
        .init();

    info!(
        "Logging initialized for {}: {}",
        app_name,
        log_dir.join(log_file).display()
    );

    guard
}
