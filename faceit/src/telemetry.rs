use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Log file {0:?} has no file name")]
    InvalidLogfile(std::path::PathBuf),
    #[error(transparent)]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber, logging to stderr and optionally to `logfile`.
///
/// The returned guard has to be kept alive until the program exits, otherwise
/// buffered lines of the log file are lost.
pub fn init(logfile: Option<&Path>) -> Result<Option<WorkerGuard>, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match logfile {
        Some(path) => {
            let name = path
                .file_name()
                .ok_or_else(|| TelemetryError::InvalidLogfile(path.to_owned()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new("."));

            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);
    tracing::subscriber::set_global_default(registry)?;

    Ok(guard)
}
