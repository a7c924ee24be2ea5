pub mod logging;

pub use logging::{get_current_log_path, LogConfig};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the default configuration
pub fn init() -> Result<TelemetryGuard> {
    init_with_config(LogConfig::default())
}

/// Initialize tracing with a JSON file layer and a compact stdout layer
pub fn init_with_config(config: LogConfig) -> Result<TelemetryGuard> {
    let file_appender = logging::create_file_appender(&config)?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pulse_desktop=debug"));

    // Structured logs on disk, human-readable logs on the console
    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let stdout_layer = fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Logging initialized - logs at: {:?}", config.log_dir);

    Ok(TelemetryGuard {
        _log_config: config,
        _file_guard: file_guard,
        _stdout_guard: stdout_guard,
    })
}

/// Keeps the non-blocking log writers alive for the lifetime of the process
pub struct TelemetryGuard {
    _log_config: LogConfig,
    _file_guard: WorkerGuard,
    _stdout_guard: WorkerGuard,
}
