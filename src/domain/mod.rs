//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AvatarRequest, IdentityHash, IdentityKind, RemoteHash, ResolveArgs};
pub use errors::AvatarError;
pub use ports::{RemoteFetchPort, SettingsPort};
