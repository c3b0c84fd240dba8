//! tracing subscriber setup
//!
//! Console output always goes to stderr so that `--output -` can stream CSV on
//! stdout. A JSON rolling file under `logging.local_path` is opt-in.

use crate::config::LoggingConfig;
use crate::domain::{CandexError, Result};
use std::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log file name prefix inside `logging.local_path`
const LOG_FILE_PREFIX: &str = "candex.log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive
///
/// Dropping it flushes buffered file output, so hold it until the process is
/// about to exit.
pub struct LoggingGuard {
    _file_writer: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// # Errors
///
/// Returns [`CandexError::Configuration`] for an unknown level, a log
/// directory that cannot be created, or a subscriber that is already set.
///
/// # Example
///
/// ```no_run
/// use candex::config::LoggingConfig;
/// use candex::logging::init_logging;
///
/// let _guard = init_logging("debug", &LoggingConfig::default()).unwrap();
/// tracing::debug!("visible");
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("candex={level}")));

    let mut layers = vec![stderr_layer(filter.clone())];
    let mut file_writer = None;

    if config.local_enabled {
        let (layer, guard) = json_file_layer(config, filter)?;
        layers.push(layer);
        file_writer = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| CandexError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(
        level = %level,
        file_logging = config.local_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn stderr_layer<S>(filter: EnvFilter) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter)
        .boxed()
}

fn json_file_layer<S>(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        CandexError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(
        parse_rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_PREFIX,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

fn parse_rotation(rotation: &str) -> Rotation {
    if rotation == "hourly" {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    }
}

/// Level names only; numeric levels are refused
fn parse_log_level(level: &str) -> Result<Level> {
    let named = !level.is_empty() && level.chars().all(|c| c.is_ascii_alphabetic());
    named
        .then(|| Level::from_str(level).ok())
        .flatten()
        .ok_or_else(|| {
            CandexError::Configuration(format!(
                "Invalid log level '{level}'. Must be one of: trace, debug, info, warn, error"
            ))
        })
}
