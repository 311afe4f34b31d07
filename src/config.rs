use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::procfs::ProcRoot;
use crate::procfs::line::DEFAULT_MAX_LEN;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub table: TableConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub procfs_root: PathBuf,
    pub refresh_interval_ms: u64,
    pub sample_interval_ms: u64,
    pub max_line_len: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            procfs_root: PathBuf::from(ProcRoot::DEFAULT),
            refresh_interval_ms: 1000,
            sample_interval_ms: 1000,
            max_line_len: DEFAULT_MAX_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub name_width: usize,
    pub user_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            name_width: 25,
            user_width: 15,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("inspector").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
