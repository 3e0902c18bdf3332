//! Identity lookup port definition.

use async_trait::async_trait;

use crate::domain::entities::{IdentityHash, IdentityKind};

/// Owner record behind an identity hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Registered user or anonymous author.
    pub kind: IdentityKind,
    /// Raw identifier (email address), when the owner shared one.
    pub identifier: Option<String>,
}

/// Port resolving a hash back to its owner.
#[async_trait]
pub trait IdentityLookupPort: Send + Sync {
    /// Looks up the owner of `hash`.
    async fn lookup(&self, hash: &IdentityHash) -> Option<IdentityRecord>;
}
