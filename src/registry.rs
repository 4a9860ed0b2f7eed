//! Process-wide resource registry. Registration happens once, during
//! single-threaded startup; after that the registry is only read, so it can
//! be shared behind an `Arc` across request handlers.

use crate::error::ConfigError;
use crate::resource::ResourceClass;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps every registered, non-abstract resource class by its computed base
/// URL (the uniqueness key) and by its registration name (the key
/// relationship resolution looks up).
#[derive(Default)]
pub struct Registry {
    by_base_url: HashMap<String, Arc<ResourceClass>>,
    by_name: HashMap<String, Arc<ResourceClass>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a class, enforcing base-URL and name uniqueness. Abstract
    /// classes are returned untouched without being registered. The `Arc`
    /// handed back is the same one the registry retains.
    pub fn register(&mut self, class: ResourceClass) -> Result<Arc<ResourceClass>, ConfigError> {
        let class = Arc::new(class);
        if class.is_abstract() {
            tracing::debug!(name = class.name(), "skipping abstract resource");
            return Ok(class);
        }
        if let Some(existing) = self.by_base_url.get(class.base_url()) {
            return Err(ConfigError::DuplicateEndpoint {
                endpoint: class.base_url().to_string(),
                existing: existing.name().to_string(),
            });
        }
        if let Some(existing) = self.by_name.get(class.name()) {
            return Err(ConfigError::DuplicateEndpoint {
                endpoint: class.name().to_string(),
                existing: existing.name().to_string(),
            });
        }
        tracing::info!(
            name = class.name(),
            base_url = class.base_url(),
            "registered resource"
        );
        self.by_base_url
            .insert(class.base_url().to_string(), Arc::clone(&class));
        self.by_name
            .insert(class.name().to_string(), Arc::clone(&class));
        Ok(class)
    }

    /// Look up a class by registration name (relationship targets).
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceClass>> {
        self.by_name.get(name)
    }

    pub fn get_by_base_url(&self, base_url: &str) -> Option<&Arc<ResourceClass>> {
        self.by_base_url.get(base_url)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ResourceClass>> {
        self.by_base_url.values()
    }

    pub fn len(&self) -> usize {
        self.by_base_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_base_url.is_empty()
    }

    /// Drop every registration. Intended for test isolation between cases
    /// that build resources with overlapping URLs; not part of normal
    /// runtime use.
    pub fn clear(&mut self) {
        self.by_base_url.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceConfig;

    fn class(config: ResourceConfig) -> ResourceClass {
        ResourceClass::new(config).unwrap()
    }

    #[test]
    fn registered_class_is_retrievable_both_ways() {
        let mut registry = Registry::new();
        let basket = registry
            .register(class(ResourceConfig::new("Basket").pks(["basketid"])))
            .unwrap();
        assert!(Arc::ptr_eq(registry.get("Basket").unwrap(), &basket));
        assert!(registry.get_by_base_url("/basket/<basketid>").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_base_url_is_a_definition_time_error() {
        let mut registry = Registry::new();
        registry
            .register(class(ResourceConfig::new("First").resource_name("shared")))
            .unwrap();
        let err = registry
            .register(class(ResourceConfig::new("Second").resource_name("shared")))
            .unwrap_err();
        match err {
            ConfigError::DuplicateEndpoint { endpoint, existing } => {
                assert_eq!(endpoint, "/shared");
                assert_eq!(existing, "First");
            }
            other => panic!("expected DuplicateEndpoint, got {other}"),
        }
    }

    #[test]
    fn same_resource_name_with_distinct_pks_is_allowed() {
        // Basket and ItemSelection both live under /basket but their pk
        // segments keep the base URLs distinct.
        let mut registry = Registry::new();
        registry
            .register(class(
                ResourceConfig::new("Basket")
                    .resource_name("basket")
                    .pks(["basketid"])
                    .append_slash(true),
            ))
            .unwrap();
        registry
            .register(class(
                ResourceConfig::new("ItemSelection")
                    .resource_name("basket")
                    .pks(["basketid", "itemid"]),
            ))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn abstract_classes_are_not_registered() {
        let mut registry = Registry::new();
        registry
            .register(class(ResourceConfig::new("Base").abstract_resource()))
            .unwrap();
        assert!(registry.is_empty());

        // A concrete class may take the URL an abstract one computed.
        registry
            .register(class(ResourceConfig::new("Base")))
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_resets_process_wide_state() {
        let mut registry = Registry::new();
        registry
            .register(class(ResourceConfig::new("Basket").pks(["basketid"])))
            .unwrap();
        registry.clear();
        assert!(registry.is_empty());
        // Re-registering after clear must not collide.
        registry
            .register(class(ResourceConfig::new("Basket").pks(["basketid"])))
            .unwrap();
    }
}
