//! Avatar Cache - privacy-preserving avatar resolution.
//!
//! Resolves user avatars from generated identicons, a remote avatar service,
//! uploaded images or plain image URLs, and keeps every artifact in a sharded,
//! publicly served file cache addressed by a salted identity hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the resolver, handlers and maintenance.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "avatar-cache";
