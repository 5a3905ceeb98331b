//! Configuration loading and validation for the runner.
//!
//! Handles loading and validating the TOML configuration file, by default
//! `/etc/jira-reindex-runner.toml`.

use jira_reindex_api::{ClientConfig, ReindexType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

/// Default path for the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/jira-reindex-runner.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub main: MainSettings,

    /// Jira connection and re-index settings.
    #[serde(default)]
    pub jira: JiraSettings,

    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainSettings {
    /// When false the runner exits right away without contacting Jira.
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraSettings {
    /// Base URL of the Jira instance (e.g., "https://jira.example.com").
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// One of "", "FOREGROUND", "BACKGROUND" or "BACKGROUND_PREFERRED".
    /// Empty means BACKGROUND_PREFERRED.
    #[serde(default)]
    pub reindex_type: String,
}

/// Logger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Path to the log file. Logs go to stderr when unset.
    #[serde(default)]
    pub file: Option<String>,

    /// Octal permissions used when the log file is created.
    #[serde(default = "default_log_perms")]
    pub perms: String,

    /// Minimal level: debug, info, warn, error or crit.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            perms: default_log_perms(),
            level: default_log_level(),
        }
    }
}

fn default_log_perms() -> String {
    "0644".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Minimal log level accepted in `log.level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Crit,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            // tracing has no level above error
            LogLevel::Error | LogLevel::Crit => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "crit" => Ok(LogLevel::Crit),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Crit => write!(f, "crit"),
        }
    }
}

/// Errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Property {0} must be set")]
    MissingRequiredField(&'static str),

    #[error("Property jira.url contains invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error(
        "Property jira.reindex_type has unsupported value '{0}' (allowed: FOREGROUND, BACKGROUND, BACKGROUND_PREFERRED)"
    )]
    InvalidReindexType(String),

    #[error("Property log.level has unsupported value '{0}' (allowed: debug, info, warn, error, crit)")]
    InvalidLogLevel(String),

    #[error("Property log.perms has invalid file mode '{0}'")]
    InvalidLogPerms(String),

    #[error("Log directory {0} does not exist or is not a directory")]
    InvalidLogDir(String),
}

impl AppConfig {
    /// Read and parse configuration from a specific path.
    ///
    /// The result is not validated; call [`AppConfig::validate`] before use.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = expand_tilde(path);
        let content =
            std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&content)
    }

    /// Parse configuration from a string (useful for testing).
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        self.validate_required(&mut errors);
        self.validate_url(&mut errors);
        self.validate_reindex_type(&mut errors);
        self.validate_log(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_required(&self, errors: &mut Vec<ConfigError>) {
        let required = [
            ("jira.url", &self.jira.url),
            ("jira.username", &self.jira.username),
            ("jira.password", &self.jira.password),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                errors.push(ConfigError::MissingRequiredField(name));
            }
        }
    }

    fn validate_url(&self, errors: &mut Vec<ConfigError>) {
        if self.jira.url.trim().is_empty() {
            return;
        }

        let invalid = |message: String| ConfigError::InvalidUrl {
            url: self.jira.url.clone(),
            message,
        };

        match reqwest::Url::parse(&self.jira.url) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push(invalid(format!("unsupported scheme '{}'", url.scheme())));
            }
            Ok(url) if url.host_str().is_none_or(str::is_empty) => {
                errors.push(invalid("host is missing".to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(invalid(e.to_string())),
        }
    }

    fn validate_reindex_type(&self, errors: &mut Vec<ConfigError>) {
        if ReindexType::from_str(&self.jira.reindex_type).is_err() {
            errors.push(ConfigError::InvalidReindexType(
                self.jira.reindex_type.clone(),
            ));
        }
    }

    fn validate_log(&self, errors: &mut Vec<ConfigError>) {
        if LogLevel::from_str(&self.log.level).is_err() {
            errors.push(ConfigError::InvalidLogLevel(self.log.level.clone()));
        }

        if u32::from_str_radix(&self.log.perms, 8).is_err() {
            errors.push(ConfigError::InvalidLogPerms(self.log.perms.clone()));
        }

        if let Some(file) = self.log_file() {
            let dir = match file.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            if !dir.is_dir() {
                errors.push(ConfigError::InvalidLogDir(dir.display().to_string()));
            }
        }
    }

    /// Re-index type to request, falling back to the default for empty or
    /// unknown values.
    pub fn effective_reindex_type(&self) -> ReindexType {
        ReindexType::from_str(&self.jira.reindex_type).unwrap_or_default()
    }

    /// Effective log level, falling back to info.
    pub fn effective_log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log.level).unwrap_or_default()
    }

    /// Effective log file mode, falling back to 0644.
    pub fn effective_log_perms(&self) -> u32 {
        u32::from_str_radix(&self.log.perms, 8).unwrap_or(0o644)
    }

    /// Get the expanded log file path, if file logging is configured.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .file
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(expand_tilde)
    }

    /// Connection settings for the Jira client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.jira.url.clone(),
            username: self.jira.username.clone(),
            password: self.jira.password.clone(),
        }
    }
}

/// Expand ~ to home directory in paths.
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path_str = path.as_ref().to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    path.as_ref().to_path_buf()
}
