// src/config.rs
//
// Optional TOML configuration. Every key has a default, so a missing file
// and an empty file behave the same.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROMPT: &str = "$ ";
const CONFIG_ENV: &str = "MINISHELL_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub log_filter: String,
    pub history: HistoryConfig,
    pub compat: CompatConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub file: Option<PathBuf>,
    pub size: usize,
}

/// Switches that reproduce the older behaviour of the shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompatConfig {
    /// Only launch generic commands that end in `&`.
    pub foreground_requires_ampersand: bool,
    /// Put stdin back after `cmd < file`.
    pub restore_stdin_after_redirect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            log_filter: "warn".to_string(),
            history: HistoryConfig::default(),
            compat: CompatConfig::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig { file: None, size: 1000 }
    }
}

impl Default for CompatConfig {
    fn default() -> Self {
        CompatConfig {
            foreground_requires_ampersand: false,
            restore_stdin_after_redirect: true,
        }
    }
}

impl Config {
    /// Load from `$MINISHELL_CONFIG` or the per-user config directory.
    /// A file that does not exist yields the defaults.
    pub fn load() -> Result<Config> {
        match config_path() {
            Some(path) if path.exists() => Config::from_file(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// `PS1` wins over the configured prompt.
    pub fn prompt(&self, ps1: Option<String>) -> String {
        ps1.unwrap_or_else(|| self.prompt.clone())
    }

    pub fn history_file(&self) -> PathBuf {
        self.history.file.clone().unwrap_or_else(|| {
            dirs::home_dir().unwrap_or_default().join(".minishell_history")
        })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("minishell").join("config.toml"))
}
