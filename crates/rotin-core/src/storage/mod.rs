pub mod cache;
pub mod config;
pub mod defaults;

pub use cache::LocalCache;
pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Keys of the local cache.
pub mod keys {
    use crate::day::DayKey;

    pub const TASKS: &str = "rotin.tasks";
    pub const SCHEDULE: &str = "rotin.schedule";

    /// Subject list of one day.
    pub fn subjects(day: &DayKey) -> String {
        format!("subject-notes.v1.{day}")
    }

    /// Last open subject of one day.
    pub fn active_subject(day: &DayKey) -> String {
        format!("subject-notes.active.{day}")
    }
}

/// Returns the data directory, creating it if needed.
///
/// `ROTIN_HOME` wins when set. Otherwise `~/.config/rotin[-dev]/`, with
/// `ROTIN_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ROTIN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir().ok_or(ConfigError::NoDataDir)?.join(".config");
            let env = std::env::var("ROTIN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rotin-dev")
            } else {
                base_dir.join("rotin")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
