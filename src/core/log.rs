//! Log sink configuration and subscriber setup.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::{FilterExt, Targets, filter_fn},
    fmt::{self, MakeWriter},
    prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "usdrub";

/// Target of the final error line. The console sink skips it because the
/// same line is already printed on stdout.
pub const REPORT_TARGET: &str = "usdrub::report";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Verbosity accepted by `--LOGS` and the `console_level` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[value(alias = "trace")]
    #[serde(alias = "trace")]
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    /// Same as `error`; tracing has no separate critical level
    Critical,
}

impl LogLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// A destination for log records.
#[derive(Debug, Clone, PartialEq)]
pub enum LogSink {
    /// Appends plain lines with timestamp, target, level and message
    File { path: PathBuf, level: LogLevel },
    /// Writes to stderr; `RUST_LOG` overrides the level
    Console { level: LogLevel },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub sinks: Vec<LogSink>,
}

impl LogConfig {
    /// The usual pair of a persistent file sink and a console sink.
    pub fn new(
        log_file: impl Into<PathBuf>,
        file_level: LogLevel,
        console_level: LogLevel,
    ) -> Self {
        LogConfig {
            sinks: vec![
                LogSink::File {
                    path: log_file.into(),
                    level: file_level,
                },
                LogSink::Console {
                    level: console_level,
                },
            ],
        }
    }
}

fn build_layers(config: &LogConfig) -> Result<Vec<BoxedLayer>> {
    let mut layers = Vec::with_capacity(config.sinks.len());

    for sink in &config.sinks {
        let layer = match sink {
            LogSink::File { path, level } => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                let app_filter = Targets::new().with_target(APP_TARGET, level.level_filter());

                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(app_filter)
                    .boxed()
            }
            LogSink::Console { level } => console_layer(*level, std::io::stderr),
        };
        layers.push(layer);
    }

    Ok(layers)
}

fn console_layer<W>(level: LogLevel, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.level_filter().to_string()));
    let not_report = filter_fn(|metadata| metadata.target() != REPORT_TARGET);

    fmt::layer()
        .compact()
        .without_time()
        .with_writer(writer)
        .with_filter(env_filter.and(not_report))
        .boxed()
}

pub fn init_logging(config: &LogConfig) -> Result<()> {
    let layers = build_layers(config)?;

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install log sinks")
}
