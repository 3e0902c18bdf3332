//! Application layer: avatar resolution and cache maintenance.

/// Shared service collaborators.
pub mod context;
/// Avatar source handlers.
pub mod handlers;
/// Resolver, hasher and maintenance services.
pub mod services;

pub use context::{AvatarContext, GravatarOptions};
pub use handlers::AvatarHandler;
pub use services::{AvatarResolver, CacheMaintenance, Hasher};
