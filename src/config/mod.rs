use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::BookingError;

/// Base URL of the booking backend.
pub const API_URL_ENV: &str = "BOOKING_API_URL";
/// Request timeout override, in seconds.
pub const TIMEOUT_ENV: &str = "BOOKING_API_TIMEOUT_SECS";
/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "BOOKING_CORE_CONFIG_DIR";

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "booking_core";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Disables colours and box-drawing characters.
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/".into(),
            request_timeout_secs: 30,
            plain_output: false,
        }
    }
}

impl Config {
    /// Applies environment overrides on top of file values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), BookingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.request_timeout_secs = raw.trim().parse::<u64>().map_err(|_| {
                BookingError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
        }
        Ok(())
    }
}

/// Locates and loads the optional configuration file.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BookingError> {
        Ok(Self::with_base_dir(Self::default_base_dir()?))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    fn default_base_dir() -> Result<PathBuf, BookingError> {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| BookingError::Config("unable to locate a configuration directory".into()))
    }

    /// Reads the file (defaults when absent) without environment overrides.
    pub fn load_file(&self) -> Result<Config, BookingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Effective configuration: file values, then process environment.
    pub fn load(&self) -> Result<Config, BookingError> {
        let mut config = self.load_file()?;
        config.apply_overrides(|key| env::var(key).ok())?;
        tracing::debug!(url = %config.api_base_url, "configuration loaded");
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
