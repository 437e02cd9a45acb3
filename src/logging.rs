use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "futuropal_engine";
const DEPENDENCY_LEVEL: &str = "warn";
const LOG_FILE: &str = "futuropal-engine.log";

pub struct FileLogGuard {
    _guard: WorkerGuard,
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// A bare level such as `debug` applies to this crate only; everything else
/// stays at `warn`. Full directives (`futuropal_engine::gamification=trace`,
/// `info,other=debug`) pass through untouched.
pub fn filter_directive(log_level: &str) -> String {
    let level = log_level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {
            format!("{DEPENDENCY_LEVEL},{CRATE_TARGET}={level}")
        }
        "" => format!("{DEPENDENCY_LEVEL},{CRATE_TARGET}=info"),
        _ => log_level.trim().to_string(),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays reserved
/// for the JSON payloads the binary emits.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive("info")));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    if file_logging_enabled() {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
        if let Err(err) = std::fs::create_dir_all(&log_dir) {
            eprintln!("failed to create log directory {log_dir}: {err}");
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            return Some(FileLogGuard { _guard: guard });
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    None
}
