//! Port definition for procedural icon generators.

use crate::domain::entities::{IdentityHash, ImageFormat};
use crate::domain::errors::RenderError;

/// Deterministic icon generator.
///
/// Equal inputs must produce byte-identical output. All variation comes from
/// the hash; generators never consult a random source or the clock.
pub trait IconGenerator: Send + Sync {
    /// Renders the icon for `hash` as a `size` x `size` image.
    ///
    /// # Errors
    /// Returns error if the size is zero or encoding fails.
    fn render(&self, hash: &IdentityHash, size: u32, format: ImageFormat)
    -> Result<Vec<u8>, RenderError>;
}
