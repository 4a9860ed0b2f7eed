//! A materialized resource: one snapshot of property values bound to its
//! class, alive only for the duration of request handling.

use crate::error::ApiError;
use crate::manager::Properties;
use crate::registry::Registry;
use crate::resolver::{resolve_links, ResolvedLinks};
use crate::resource::ResourceClass;
use std::sync::Arc;

pub struct ResourceInstance {
    class: Arc<ResourceClass>,
    properties: Properties,
    collection: bool,
}

impl ResourceInstance {
    pub fn new(class: Arc<ResourceClass>, properties: Properties) -> Self {
        ResourceInstance {
            class,
            properties,
            collection: false,
        }
    }

    /// A collection-shaped result, as list actions produce: the self link
    /// is the collection URL, never the pk-bearing instance URL.
    pub fn collection(class: Arc<ResourceClass>, properties: Properties) -> Self {
        ResourceInstance {
            class,
            properties,
            collection: true,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    pub fn class(&self) -> &Arc<ResourceClass> {
        &self.class
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// The self link: the class URL template filled with this instance's
    /// primary-key values, or the collection URL for collection-shaped
    /// results.
    pub fn url(&self) -> Result<String, ApiError> {
        if self.collection {
            self.class.collection_url(&self.properties)
        } else {
            self.class.instance_url(&self.properties)
        }
    }

    /// Resolve every declared relationship against the registry, in
    /// declaration order.
    pub fn links(&self, registry: &Registry) -> Result<ResolvedLinks, ApiError> {
        resolve_links(&self.class, &self.properties, registry)
    }
}

impl std::fmt::Debug for ResourceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceInstance")
            .field("class", &self.class.name())
            .field("properties", &self.properties)
            .field("collection", &self.collection)
            .finish()
    }
}
