//! Name to icon provider lookup.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::{Identicon, Retro, Rings, Silhouette};
use crate::domain::ports::IconGenerator;

/// Selectable icon style.
#[derive(Clone)]
pub struct IconProvider {
    /// Registry key, also used as the cache namespace.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Renderer for this style.
    pub generator: Arc<dyn IconGenerator>,
}

impl std::fmt::Debug for IconProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconProvider")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Lazily populated registry of the built-in icon providers.
#[derive(Debug, Default)]
pub struct IconProviderRegistry {
    providers: OnceLock<HashMap<&'static str, IconProvider>>,
}

impl IconProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn providers(&self) -> &HashMap<&'static str, IconProvider> {
        self.providers.get_or_init(|| {
            let providers: [(&'static str, &'static str, Arc<dyn IconGenerator>); 4] = [
                ("identicon", "Identicon", Arc::new(Identicon)),
                ("rings", "Rings", Arc::new(Rings)),
                ("retro", "Retro", Arc::new(Retro)),
                ("silhouette", "Silhouette", Arc::new(Silhouette)),
            ];
            debug!(count = providers.len(), "Registering icon providers");

            providers
                .into_iter()
                .map(|(name, label, generator)| {
                    (
                        name,
                        IconProvider {
                            name,
                            label,
                            generator,
                        },
                    )
                })
                .collect()
        })
    }

    /// Returns the provider registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IconProvider> {
        self.providers().get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.providers().contains_key(name)
    }

    /// Returns `(name, label)` pairs sorted by name.
    #[must_use]
    pub fn descriptors(&self) -> Vec<(&'static str, &'static str)> {
        let mut descriptors: Vec<_> = self
            .providers()
            .values()
            .map(|provider| (provider.name, provider.label))
            .collect();
        descriptors.sort_unstable();
        descriptors
    }

    /// Returns every registered provider name.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors().into_iter().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{IdentityHash, ImageFormat};

    #[test]
    fn test_builtin_providers() {
        let registry = IconProviderRegistry::new();
        assert_eq!(
            registry.names(),
            vec!["identicon", "retro", "rings", "silhouette"]
        );
        assert!(registry.contains("identicon"));
        assert!(!registry.contains("gravatar"));
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_providers_render() {
        let registry = IconProviderRegistry::new();
        let hash = IdentityHash::compute("salt", "someone@example.com");
        for name in registry.names() {
            let provider = registry.get(name).unwrap();
            let svg = provider.generator.render(&hash, 32, ImageFormat::Svg).unwrap();
            assert!(svg.starts_with(b"<svg"), "{name} did not produce svg");
        }
    }

    #[test]
    fn test_map_is_built_once() {
        let registry = IconProviderRegistry::new();
        let first: *const _ = registry.get("rings").unwrap();
        let second: *const _ = registry.get("rings").unwrap();
        assert_eq!(first, second);
    }
}
