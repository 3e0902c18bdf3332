//! Infrastructure layer with filesystem, HTTP and rendering adapters.

/// Sharded on-disk artifact store.
pub mod cache;
/// Application configuration.
pub mod config;
/// Procedural icon generators.
pub mod icons;
pub mod imaging;
/// Outbound HTTP.
pub mod remote;

pub use cache::{AgeFilter, CacheFilter, FileCache, PatternFilter};
pub use config::{
    AppConfig, CliArgs, Command, FileSettingsStore, LogLevel, ResolveCommand, StorageManager,
};
pub use icons::{IconProvider, IconProviderRegistry};
pub use remote::HttpFetcher;
