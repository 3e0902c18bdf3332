//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;

pub(super) const APP_NAME: &str = "avatar-cache";
pub(super) const APP_QUALIFIER: &str = "org";
pub(super) const APP_ORGANIZATION: &str = "avatar-cache";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Hashing salt. Takes precedence over the persisted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// Cache storage configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Remote avatar service configuration.
    #[serde(default)]
    pub gravatar: GravatarConfig,

    /// Cache sweep configuration.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Where artifacts are stored and how they are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage root. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Public URL prefix matching the storage root.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: None,
            base_url: default_base_url(),
        }
    }
}

/// Remote avatar service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravatarConfig {
    /// Whether the `gravatar` type is served at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Avatar endpoint, without the hash.
    #[serde(default = "default_gravatar_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rating used when neither the request nor the persisted options set one.
    #[serde(default = "default_rating")]
    pub default_rating: String,
}

impl Default for GravatarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_gravatar_url(),
            timeout_secs: default_timeout_secs(),
            default_rating: default_rating(),
        }
    }
}

/// Age limits for the periodic sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Maximum age of fetched remote and legacy artifacts.
    #[serde(default = "default_remote_max_age")]
    pub remote_max_age_secs: u64,

    /// Maximum age of generated icons.
    #[serde(default = "default_generated_max_age")]
    pub generated_max_age_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            remote_max_age_secs: default_remote_max_age(),
            generated_max_age_secs: default_generated_max_age(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "/avatars/".to_string()
}

fn default_gravatar_url() -> String {
    "https://www.gravatar.com/avatar".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_rating() -> String {
    "g".to_string()
}

fn default_remote_max_age() -> u64 {
    24 * 60 * 60
}

fn default_generated_max_age() -> u64 {
    30 * 24 * 60 * 60
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(salt) = &args.salt {
            self.salt = Some(salt.clone());
        }
        if let Some(root) = &args.cache_root {
            self.cache.root = Some(root.clone());
        }
        if let Some(base_url) = &args.base_url {
            self.cache.base_url.clone_from(base_url);
        }
        if let Some(timeout) = args.timeout_secs {
            self.gravatar.timeout_secs = timeout;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("avatar-cache.log"))
    }

    /// Returns default cache root.
    #[must_use]
    pub fn default_cache_root() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.cache_dir().join("avatars"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns effective cache root.
    #[must_use]
    pub fn effective_cache_root(&self) -> Option<PathBuf> {
        self.cache.root.clone().or_else(Self::default_cache_root)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            salt: None,
            cache: CacheConfig::default(),
            gravatar: GravatarConfig::default(),
            maintenance: MaintenanceConfig::default(),
        }
    }
}
