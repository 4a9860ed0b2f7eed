//! Wire-format adapters. The core hands an adapter the materialized
//! instance plus the registry; the adapter decides the document shape.
//! HAL (`_links`/`_embedded`) is the default.

use crate::error::ApiError;
use crate::registry::Registry;
use crate::resolver::ResolvedLink;
use crate::resource::ResourceInstance;
use serde_json::{json, Map, Value};

pub trait Adapter: Send + Sync {
    fn serialize(&self, instance: &ResourceInstance, registry: &Registry)
        -> Result<Value, ApiError>;
}

/// HAL-style documents: raw properties at the top level, `self` plus the
/// resolved relationship links under `_links` (declaration order), and
/// to-many element properties under `_embedded`. A relationship named like
/// a property never clobbers it; the link lives under `_links`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HalAdapter;

impl Adapter for HalAdapter {
    fn serialize(
        &self,
        instance: &ResourceInstance,
        registry: &Registry,
    ) -> Result<Value, ApiError> {
        let mut document = instance.properties().clone();
        let mut links = Map::new();
        links.insert("self".to_string(), json!({ "href": instance.url()? }));

        let mut embedded = Map::new();
        for (name, link) in instance.links(registry)? {
            match link {
                ResolvedLink::One(link) => {
                    links.insert(name, json!({ "href": link.href }));
                }
                ResolvedLink::Many(items) => {
                    let hrefs: Vec<Value> =
                        items.iter().map(|l| json!({ "href": l.href })).collect();
                    let elements: Vec<Value> = items
                        .into_iter()
                        .filter_map(|l| l.embedded.map(Value::Object))
                        .collect();
                    links.insert(name.clone(), Value::Array(hrefs));
                    if !elements.is_empty() {
                        embedded.insert(name, Value::Array(elements));
                    }
                }
            }
        }

        document.insert("_links".to_string(), Value::Object(links));
        if !embedded.is_empty() {
            document.insert("_embedded".to_string(), Value::Object(embedded));
        }
        Ok(Value::Object(document))
    }
}
