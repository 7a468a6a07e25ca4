use crate::error::ConfigError;
use crate::settings::Logging;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "crypto-recommendation.log";

/// Installs the global tracing subscriber.
///
/// Console output is always on. When `logging.directory` is set, a daily rolling
/// file layer is added as well; the returned guard must be held for the lifetime
/// of the process or buffered lines are lost on exit.
pub fn init_tracing(logging: &Logging) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    let console = fmt::layer().with_target(true);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer().with_ansi(false).with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            tracing::debug!(directory = %directory.display(), "File logging enabled.");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(None)
        }
    }
}
