//! Hash value objects addressing cached avatars.

use std::fmt;

use sha2::{Digest, Sha256};

/// Length of a hex encoded sha-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Normalizes an identifier the way every hash in this crate expects it.
#[must_use]
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Salted sha-256 digest of a normalized identifier.
///
/// This is the local cache key. It never leaves the installation, which is
/// why it is salted: the remote avatar service must not be able to correlate
/// it with an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityHash(String);

impl IdentityHash {
    /// Computes the hash of `identifier` for the given salt.
    #[must_use]
    pub fn compute(salt: &str, identifier: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(normalize_identifier(identifier).as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Parses an existing hex digest, accepting upper case input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        (value.len() == HASH_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit()))
            .then_some(Self(value))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the nibble at `index`, wrapping around the digest.
    #[must_use]
    pub fn nibble(&self, index: usize) -> u8 {
        let c = self.0.as_bytes()[index % HASH_HEX_LEN];
        match c {
            b'0'..=b'9' => c - b'0',
            _ => c - b'a' + 10,
        }
    }

    /// Returns the byte at `index`, wrapping around the digest.
    #[must_use]
    pub fn byte(&self, index: usize) -> u8 {
        (self.nibble(index * 2) << 4) | self.nibble(index * 2 + 1)
    }

    /// Returns the first hex character.
    #[must_use]
    pub fn first_char(&self) -> char {
        char::from(self.0.as_bytes()[0])
    }

    /// Returns the second hex character.
    #[must_use]
    pub fn second_char(&self) -> char {
        char::from(self.0.as_bytes()[1])
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unsalted sha-256 digest used to address the remote avatar service.
///
/// Never use it as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteHash(String);

impl RemoteHash {
    /// Computes the remote hash of `identifier`.
    #[must_use]
    pub fn compute(identifier: &str) -> Self {
        let digest = Sha256::digest(normalize_identifier(identifier).as_bytes());
        Self(hex::encode(digest))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_normalized() {
        let a = IdentityHash::compute("pepper", "  John.Doe@Example.COM ");
        let b = IdentityHash::compute("pepper", "john.doe@example.com");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), HASH_HEX_LEN);
    }

    #[test]
    fn test_hash_depends_on_salt() {
        let a = IdentityHash::compute("pepper", "john@example.com");
        let b = IdentityHash::compute("salt", "john@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn test_remote_hash_is_unsalted_sha256() {
        // sha256("test@example.com")
        let hash = RemoteHash::compute(" Test@Example.com");
        assert_eq!(
            hash.as_str(),
            "973dfe463ec85785f5f95af5ba3906eedb2d931c24e69824a89ea65dba4e813b"
        );
    }

    #[test]
    fn test_remote_hash_differs_from_identity_hash() {
        let local = IdentityHash::compute("", "test@example.com");
        let remote = RemoteHash::compute("test@example.com");
        // Same digest input when the salt is empty, different types by construction.
        assert_eq!(local.as_str(), remote.as_str());

        let salted = IdentityHash::compute("pepper", "test@example.com");
        assert_ne!(salted.as_str(), remote.as_str());
    }

    #[test]
    fn test_parse() {
        let hash = IdentityHash::compute("pepper", "a@b.c");
        let upper = hash.as_str().to_ascii_uppercase();
        assert_eq!(IdentityHash::parse(&upper), Some(hash));
        assert_eq!(IdentityHash::parse("xyz"), None);
        assert_eq!(IdentityHash::parse(&"g".repeat(HASH_HEX_LEN)), None);
    }

    #[test]
    fn test_nibbles_and_bytes() {
        let hash = IdentityHash::parse(&format!("a5{}", "0".repeat(62))).unwrap();
        assert_eq!(hash.nibble(0), 0xa);
        assert_eq!(hash.nibble(1), 0x5);
        assert_eq!(hash.byte(0), 0xa5);
        assert_eq!(hash.nibble(HASH_HEX_LEN), 0xa);
        assert_eq!(hash.first_char(), 'a');
        assert_eq!(hash.second_char(), '5');
    }
}
