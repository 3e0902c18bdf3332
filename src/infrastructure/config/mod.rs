//! Application configuration.

pub mod app_config;
pub mod args;
pub mod options;
pub mod settings_store;
pub mod storage;

pub use app_config::{AppConfig, CacheConfig, GravatarConfig, LogLevel, MaintenanceConfig};
pub use args::{CliArgs, Command, ResolveCommand};
pub use options::PersistedOptions;
pub use settings_store::FileSettingsStore;
pub use storage::{ConfigError, StorageManager};
