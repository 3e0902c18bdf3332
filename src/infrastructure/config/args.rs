//! Command line interface.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "avatar-cache",
    version,
    about = "Resolve, cache and maintain user avatars",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Hashing salt, overriding the persisted one.
    #[arg(long, global = true, env = "AVATAR_CACHE_SALT", hide_env_values = true)]
    pub salt: Option<String>,

    /// Cache storage root.
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_root: Option<PathBuf>,

    /// Public URL prefix of the cache root.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Remote request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the local (salted) hash of an identifier.
    Hash {
        /// Email address or other identifier.
        identifier: String,

        /// Print the unsalted remote hash instead.
        #[arg(long)]
        remote: bool,
    },

    /// Resolve an avatar URL, populating the cache on a miss.
    Resolve(ResolveCommand),

    /// Purge every cached size of an uploaded avatar.
    Invalidate {
        /// Local identity hash of the owner.
        #[arg(long)]
        hash: String,
    },

    /// Delete stale remote and generated artifacts.
    Sweep {
        /// Age limit for all namespaces; defaults to the configured limits.
        #[arg(long)]
        max_age_secs: Option<u64>,
    },

    /// List the available icon providers.
    Providers,
}

/// Arguments of the `resolve` subcommand.
#[derive(Debug, clap::Args)]
pub struct ResolveCommand {
    /// Avatar type: a provider key, `gravatar`, `user` or an image URL.
    #[arg(long = "type", value_name = "TYPE")]
    pub avatar_type: String,

    /// Raw identifier (email address).
    #[arg(long)]
    pub identifier: Option<String>,

    /// Identity hash; computed from the identifier when omitted.
    #[arg(long)]
    pub hash: Option<String>,

    /// Edge length in pixels.
    #[arg(long, default_value_t = 80)]
    pub size: u32,

    /// Audience rating for the remote service.
    #[arg(long)]
    pub rating: Option<String>,

    /// Preferred output mimetype.
    #[arg(long)]
    pub mimetype: Option<String>,

    /// Regenerate even when cached.
    #[arg(long)]
    pub force: bool,

    /// Treat the identity as a registered user.
    #[arg(long)]
    pub registered: bool,

    /// URL returned when no avatar can be produced.
    #[arg(long, default_value = "")]
    pub default_url: String,

    /// Uploaded image file for the `user` type.
    #[arg(long, value_name = "PATH")]
    pub upload: Option<PathBuf>,

    /// Mimetype of the uploaded file.
    #[arg(long, default_value = "image/png")]
    pub upload_mimetype: String,
}
