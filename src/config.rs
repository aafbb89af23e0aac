//! Configuration management
//!
//! The database location comes from the command line or the environment.
//! Everything else lives in the `app_settings` table so it follows the data.

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::db::Database;
use crate::error::Error;
use crate::models::DEFAULT_REMINDER_DAYS;

// Settings keys for database storage
pub const SETTING_DEFAULT_REMINDER_DAYS: &str = "default_reminder_days";
pub const SETTING_WEEK_START: &str = "week_start";

pub const SETTING_KEYS: &[&str] = &[SETTING_DEFAULT_REMINDER_DAYS, SETTING_WEEK_START];

// Environment variable names
pub const ENV_DB_PATH: &str = "BIRTHDAYCMD_DB";

/// Resolve the database path: explicit flag, then `BIRTHDAYCMD_DB`, then the
/// platform config directory.
pub fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    resolve_db_path_from(flag, std::env::var_os(ENV_DB_PATH))
}

fn resolve_db_path_from(flag: Option<PathBuf>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
    Ok(config_dir.join("birthdaycmd").join("birthdays.db"))
}

/// First column of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Sunday => "sunday",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(Self::Monday),
            "sunday" | "sun" => Some(Self::Sunday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_reminder_days: u32,
    pub week_start: WeekStart,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_reminder_days: DEFAULT_REMINDER_DAYS,
            week_start: WeekStart::default(),
        }
    }
}

impl Config {
    /// Load settings, falling back to defaults for anything unset or
    /// unreadable.
    pub fn load(db: &Database) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = db.get_setting(SETTING_DEFAULT_REMINDER_DAYS)? {
            match raw.parse() {
                Ok(days) => config.default_reminder_days = days,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid default_reminder_days"),
            }
        }
        if let Some(raw) = db.get_setting(SETTING_WEEK_START)? {
            match WeekStart::parse(&raw) {
                Some(ws) => config.week_start = ws,
                None => tracing::warn!(value = %raw, "ignoring invalid week_start"),
            }
        }

        Ok(config)
    }

    /// Validate and persist a single setting.
    pub fn set(db: &Database, key: &str, value: &str) -> crate::Result<()> {
        let normalized = match key {
            SETTING_DEFAULT_REMINDER_DAYS => value
                .trim()
                .parse::<u32>()
                .map_err(|_| {
                    Error::validation(format!(
                        "{} must be a non-negative integer, got {:?}",
                        key, value
                    ))
                })?
                .to_string(),
            SETTING_WEEK_START => WeekStart::parse(value)
                .ok_or_else(|| {
                    Error::validation(format!("{} must be monday or sunday, got {:?}", key, value))
                })?
                .as_str()
                .to_string(),
            _ => return Err(unknown_setting(key)),
        };
        db.set_setting(key, &normalized)
    }

    /// Drop a stored setting so it falls back to its default.
    pub fn unset(db: &Database, key: &str) -> crate::Result<()> {
        if !SETTING_KEYS.contains(&key) {
            return Err(unknown_setting(key));
        }
        db.delete_setting(key)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            SETTING_DEFAULT_REMINDER_DAYS => Some(self.default_reminder_days.to_string()),
            SETTING_WEEK_START => Some(self.week_start.as_str().to_string()),
            _ => None,
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }
}

fn unknown_setting(key: &str) -> Error {
    Error::validation(format!(
        "Unknown setting {:?}. Known settings: {}",
        key,
        SETTING_KEYS.join(", ")
    ))
}
