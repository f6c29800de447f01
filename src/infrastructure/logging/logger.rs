use crate::domain::models::LoggingConfig;
use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logger implementation using tracing.
///
/// Keep the returned value alive for the life of the process: dropping it
/// drops the non-blocking appender guard and buffered file output is lost.
pub struct Logger {
    _guard: Option<WorkerGuard>,
}

impl Logger {
    /// Initialize logging for the daemonized supervisor.
    ///
    /// The daemon runs with stdio detached, so everything goes to a daily
    /// rolling file under `config.dir`, JSON or pretty per `config.format`.
    pub fn init_daemon(config: &LoggingConfig) -> Result<Self> {
        let env_filter = env_filter(&config.level)?;

        let file_appender = rolling::daily(&config.dir, "drover.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        if config.format == "json" {
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(file_layer).init();
        } else {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(file_layer).init();
        }

        tracing::info!(
            level = %config.level,
            format = %config.format,
            dir = %config.dir,
            "logger initialized"
        );

        Ok(Self { _guard: Some(guard) })
    }

    /// Initialize logging for foreground CLI commands: stderr, no file.
    pub fn init_cli() -> Self {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();

        Self { _guard: None }
    }
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    let default_level = parse_log_level(level)?;
    Ok(EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy())
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
