//! Two level shard directories for cached artifacts.
//!
//! Registered and anonymous identities share one hash space. The first hex
//! digit decides which kind a hash "naturally" belongs to; when that does not
//! match the declared kind the first directory is replaced by a reserved,
//! non-hex letter so the two kinds never share a directory.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::IdentityHash;

/// Owner kind of an identity hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    /// A registered user account.
    Registered,
    /// An anonymous author identified only by an email address.
    #[default]
    Anonymous,
}

impl IdentityKind {
    /// Reserved first-level directory used when the hash lands on the other kind.
    #[must_use]
    pub const fn substitute(self) -> char {
        match self {
            Self::Registered => 'u',
            Self::Anonymous => 'g',
        }
    }
}

/// Natural kind for each leading hex digit.
const KIND_BY_NIBBLE: [IdentityKind; 16] = [
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Registered,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
    IdentityKind::Anonymous,
];

/// Shard directory pair, rendered as `a/b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardPath {
    first: char,
    second: char,
}

impl ShardPath {
    /// Computes the shard for `hash` declared as `kind`.
    #[must_use]
    pub fn for_hash(hash: &IdentityHash, kind: IdentityKind) -> Self {
        let natural = KIND_BY_NIBBLE[usize::from(hash.nibble(0))];
        let first = if natural == kind {
            hash.first_char()
        } else {
            kind.substitute()
        };

        Self {
            first,
            second: hash.second_char(),
        }
    }

    /// First level directory.
    #[must_use]
    pub const fn first(self) -> char {
        self.first
    }

    /// Second level directory.
    #[must_use]
    pub const fn second(self) -> char {
        self.second
    }
}

impl fmt::Display for ShardPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}
