use crate::error::{ConfigErrorKind, InfraError};
use crate::sheets::{DEFAULT_SPREADSHEET_ID, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http_addr: String,       // e.g. "0.0.0.0:8000"
    pub items_file: PathBuf,     // e.g. "items.csv"
    pub recipes_file: PathBuf,   // e.g. "recipes.csv"
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Try the remote spreadsheet before the local files
    pub enabled: bool,
    pub spreadsheet_id: String,
    /// Per request timeout, in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8000".to_string(),
            items_file: PathBuf::from("items.csv"),
            recipes_file: PathBuf::from("recipes.csv"),
            sheets: SheetsConfig::default(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl SheetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let config_err = |source| InfraError::Config {
            path: path.to_path_buf(),
            source,
        };

        let data = std::fs::read_to_string(path).map_err(|e| config_err(ConfigErrorKind::Read(e)))?;
        let cfg: Self = toml::from_str(&data).map_err(|e| config_err(ConfigErrorKind::Parse(e)))?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self, InfraError> {
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup. `PORT` sets the port on all interfaces;
    /// `HTTP_ADDR` overrides the whole listen address.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InfraError> {
        let mut cfg = Self::default();

        if let Some(port) = parsed::<u16>(&lookup, "PORT")? {
            cfg.http_addr = format!("0.0.0.0:{port}");
        }
        if let Some(addr) = lookup("HTTP_ADDR") {
            cfg.http_addr = addr;
        }
        if let Some(path) = lookup("ITEMS_FILE") {
            cfg.items_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("RECIPES_FILE") {
            cfg.recipes_file = PathBuf::from(path);
        }
        if let Some(enabled) = lookup("SHEETS_ENABLED") {
            cfg.sheets.enabled = parse_flag(&enabled).ok_or_else(|| env_error("SHEETS_ENABLED", &enabled))?;
        }
        if let Some(id) = lookup("SHEETS_SPREADSHEET_ID") {
            cfg.sheets.spreadsheet_id = id;
        }
        if let Some(secs) = parsed::<u64>(&lookup, "SHEETS_TIMEOUT_SECS")? {
            cfg.sheets.timeout_secs = secs;
        }

        Ok(cfg)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, InfraError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| env_error(key, &raw)),
        None => Ok(None),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_error(key: &str, value: &str) -> InfraError {
    InfraError::Config {
        path: PathBuf::from(".env"),
        source: ConfigErrorKind::InvalidEnv(key.to_string(), value.to_string()),
    }
}
