//! Configuration
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file
//! (`$MUCALC_CONFIG`, else `$HOME/.config/mucalc/config.toml`), then
//! `MUCALC_*` environment variables.

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[cfg(windows)]
const HISTORY_DIR_VAR: &str = "APPDATA";
#[cfg(windows)]
const HISTORY_FILE_NAME: &str = "mucalc_history.txt";
#[cfg(not(windows))]
const HISTORY_DIR_VAR: &str = "HOME";
#[cfg(not(windows))]
const HISTORY_FILE_NAME: &str = ".mucalc_history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Overrides the platform history location
    pub history_file: Option<PathBuf>,
    /// Maximum number of history entries kept
    pub history_size: usize,
    /// Log filter used when neither `RUST_LOG` nor `--verbose` is given
    pub log_level: String,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            history_size: 1000,
            log_level: "warn".to_string(),
        }
    }
}

impl CalcConfig {
    /// Load from the default locations.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path().as_deref())
    }

    /// Load with `file` as the TOML layer. A missing file is skipped.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment
            .merge(Env::prefixed("MUCALC_"))
            .extract()
            .context("Failed to load mucalc configuration")
    }

    /// Where interactive history is read from and written to
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(default_history_path)
    }
}

/// `$MUCALC_CONFIG`, else `$HOME/.config/mucalc/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    env::var_os("MUCALC_CONFIG")
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME").map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("mucalc")
                    .join("config.toml")
            })
        })
}

/// `$HOME/.mucalc_history`, or `%APPDATA%\mucalc_history.txt` on Windows.
/// Falls back to the bare file name when the variable is unset.
pub fn default_history_path() -> PathBuf {
    history_path_in(env::var_os(HISTORY_DIR_VAR))
}

fn history_path_in(dir: Option<OsString>) -> PathBuf {
    match dir {
        Some(dir) => PathBuf::from(dir).join(HISTORY_FILE_NAME),
        None => PathBuf::from(HISTORY_FILE_NAME),
    }
}
