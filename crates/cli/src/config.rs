//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# Quibly configuration
# See: quibly --help for all options

# Minutes after "now" that a reminder without a time fires
reminder_lead_minutes = 60

# Seconds between reminder checks in --watch mode
check_interval = 60

# Disable colored output
no_color = false

# Where reminders, todos, notes and the chat log are kept
# (defaults to the platform data directory)
# data_dir = "~/.local/share/quibly"
"#;

const DEFAULT_LEAD_MINUTES: i64 = 60;
const DEFAULT_CHECK_INTERVAL: u64 = 60;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reminder_lead_minutes: Option<i64>,
    pub check_interval: Option<u64>,
    pub no_color: Option<bool>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux: `~/.config/quibly/config.toml`
    /// - macOS: `~/Library/Application Support/quibly/config.toml`
    /// - Windows: `%APPDATA%\quibly\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quibly").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get reminder_lead_minutes with precedence: env > config > default.
    pub fn reminder_lead_minutes(&self) -> i64 {
        Self::env_var("QUIBLY_REMINDER_LEAD")
            .or(self.reminder_lead_minutes)
            .unwrap_or(DEFAULT_LEAD_MINUTES)
    }

    /// Get check_interval with precedence: env > config > default.
    ///
    /// Zero is not a usable interval and falls back to the default.
    pub fn check_interval(&self) -> u64 {
        Self::env_var("QUIBLY_CHECK_INTERVAL")
            .or(self.check_interval)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CHECK_INTERVAL)
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        // NO_COLOR is a standard - presence means disable color
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("QUIBLY_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }

    /// Get data_dir with precedence: env > config > platform default.
    pub fn data_dir(&self) -> Option<PathBuf> {
        std::env::var_os("QUIBLY_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| self.data_dir.clone())
            .or_else(|| dirs::data_dir().map(|p| p.join("quibly")))
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("DEFAULT_CONFIG should parse");
        assert_eq!(config.reminder_lead_minutes, Some(60));
        assert_eq!(config.check_interval, Some(60));
        assert_eq!(config.no_color, Some(false));
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
reminder_lead_minutes = 15
data_dir = "/tmp/quibly-data"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.reminder_lead_minutes, Some(15));
        assert_eq!(config.check_interval, None);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/quibly-data")));
    }

    #[test]
    fn test_zero_interval_uses_default() {
        let config: Config = toml::from_str("check_interval = 0").unwrap();
        assert_eq!(config.check_interval, Some(0));
        if std::env::var("QUIBLY_CHECK_INTERVAL").is_err() {
            assert_eq!(config.check_interval(), 60);
        }
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        if std::env::var("QUIBLY_REMINDER_LEAD").is_err() {
            assert_eq!(config.reminder_lead_minutes(), 60);
        }
        if std::env::var("NO_COLOR").is_err() && std::env::var("QUIBLY_NO_COLOR").is_err() {
            assert!(!config.no_color());
        }
    }
}
