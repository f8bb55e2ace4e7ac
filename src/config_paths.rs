//! Where flexdock keeps its files
//!
//! Everything lives under one directory:
//! - Unix/macOS: `$XDG_CONFIG_HOME/flexdock/`, falling back to `~/.config/flexdock/`
//! - Windows: `%APPDATA%\flexdock\`
//!
//! ```text
//! flexdock/
//!   config.yaml            engine defaults (see `EngineConfig`)
//!   logs/flexdock.log.*    daily-rotated debug logs
//! ```

use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "flexdock";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "flexdock.log";

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = dirs::config_dir();

    // XDG layout on macOS too, rather than ~/Library/Application Support
    #[cfg(not(target_os = "windows"))]
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

    base.map(|dir| dir.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    Some(config_dir()?.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    Some(config_dir()?.join(LOGS_DIR))
}

/// Create the logs directory (and the config directory above it)
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let dir = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    Ok(dir)
}
