use color_eyre::eyre::{Result, eyre};
use tracing::Level;

use crate::config::LoggingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Parses a level name; unknown names fall back to `warn`.
pub fn parse_level(s: &str) -> Level {
    s.parse().unwrap_or(Level::WARN)
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only the report.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        parse_level(&config.level)
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false);

    let installed = match LogFormat::from_str_config(&config.format) {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}
