use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

/// Log file written in the working directory.
pub const LOG_FILE: &str = "mazegen.log";

/// `DEBUG` when the `DEBUG` environment variable is `1`, `INFO` otherwise.
pub fn max_level(debug_var: Option<&str>) -> Level {
    match debug_var {
        Some("1") => Level::DEBUG,
        _ => Level::INFO,
    }
}

/// Install a global subscriber writing to [`LOG_FILE`] off the calling thread, keeping logs out
/// of the terminal output.
///
/// Logs are flushed when the returned guard is dropped, so hold on to it until exit.
pub fn init() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let level = max_level(std::env::var("DEBUG").ok().as_deref());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(false)
        .init();
    guard
}
