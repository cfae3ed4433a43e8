// src/telemetry.rs

use crate::error::ArunaAuthError;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info_span, Span};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Output format of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogEncoding {
    #[default]
    Console,
    Json,
}

/// Settings for the process-wide tracing subscriber.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. `info` or `aruna_auth=debug,warn`.
    pub level: String,
    pub encoding: LogEncoding,
    /// Also append every line to this file; stdout is always written.
    pub path: Option<PathBuf>,
    pub app: String,
    pub version: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            encoding: LogEncoding::Console,
            path: None,
            app: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl LoggingConfig {
    /// A span tagging everything recorded inside it with `app` and `version`.
    ///
    /// The host enters it once at startup, e.g. around its main future.
    pub fn service_span(&self) -> Span {
        info_span!("service", app = %self.app, version = %self.version)
    }
}

/// Installs the global `tracing` subscriber.
///
/// Fails if the level directive does not parse, the log file cannot be
/// opened, or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ArunaAuthError> {
    let filter =
        EnvFilter::try_new(&config.level).map_err(|e| ArunaAuthError::Logging(e.to_string()))?;

    let writer = match &config.path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ArunaAuthError::Logging(format!("{}: {}", path.display(), e)))?;
            BoxMakeWriter::new(std::io::stdout.and(Mutex::new(file)))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);

    let installed = match config.encoding {
        LogEncoding::Console => builder.try_init(),
        LogEncoding::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ArunaAuthError::Logging(e.to_string()))
}
