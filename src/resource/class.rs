//! The resource class model: configuration flattened into a runtime type
//! with its canonical URLs computed once, at construction.

use crate::case::to_snake_case;
use crate::endpoint::{ActionSpec, EndpointTable};
use crate::error::{ApiError, ConfigError};
use crate::manager::{Manager, Properties};
use crate::resource::{Relationship, ResourceConfig};
use crate::url::{join_parts, pk_placeholder, substitute, with_trailing_slash};
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A resource type: name, primary keys, relationships, actions, and the
/// canonical URL templates derived from them. Built once at startup and
/// immutable afterwards; request handling only reads it.
pub struct ResourceClass {
    name: String,
    resource_name: String,
    namespace: String,
    pks: Vec<String>,
    append_slash: bool,
    is_abstract: bool,
    relationships: Vec<Relationship>,
    endpoints: EndpointTable,
    actions: HashMap<String, ActionSpec>,
    manager: Option<Arc<dyn Manager>>,
    base_url: String,
    base_url_sans_pks: String,
}

impl ResourceClass {
    /// Validate the configuration and compute the URL templates.
    pub fn new(config: ResourceConfig) -> Result<Self, ConfigError> {
        validate(&config)?;

        let resource_name = config
            .resource_name
            .clone()
            .unwrap_or_else(|| to_snake_case(&config.name));

        // Collection URL: namespace/resource_name plus every non-leaf pk,
        // always with a trailing slash to mark the collection form.
        let mut parts: Vec<String> = vec![config.namespace.clone(), resource_name.clone()];
        if config.pks.len() > 1 {
            for pk in &config.pks[..config.pks.len() - 1] {
                parts.push(pk_placeholder(pk));
            }
        }
        let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let collection = join_parts(&part_refs);
        let base_url_sans_pks = with_trailing_slash(&collection);

        // Instance URL: the leaf pk appended, trailing slash only when
        // append_slash asks for it.
        let base_url = match config.pks.last() {
            Some(leaf) => {
                let joined = join_parts(&[collection.as_str(), &pk_placeholder(leaf)]);
                if config.append_slash {
                    with_trailing_slash(&joined)
                } else {
                    joined
                }
            }
            None if config.append_slash => with_trailing_slash(&collection),
            None => collection,
        };

        Ok(ResourceClass {
            name: config.name,
            resource_name,
            namespace: config.namespace,
            pks: config.pks,
            append_slash: config.append_slash,
            is_abstract: config.is_abstract,
            relationships: config.relationships,
            endpoints: config.endpoints,
            actions: config.actions,
            manager: config.manager,
            base_url,
            base_url_sans_pks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn pks(&self) -> &[String] {
        &self.pks
    }

    pub fn append_slash(&self) -> bool {
        self.append_slash
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn action_spec(&self, action: &str) -> Option<&ActionSpec> {
        self.actions.get(action)
    }

    pub fn manager(&self) -> Option<&Arc<dyn Manager>> {
        self.manager.as_ref()
    }

    /// Canonical instance URL template, pk segments as `<name>` placeholders.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection URL template (no leaf pk), always slash-terminated.
    pub fn base_url_sans_pks(&self) -> &str {
        &self.base_url_sans_pks
    }

    /// Substitute concrete property values into the instance URL template.
    pub fn instance_url(&self, properties: &Properties) -> Result<String, ApiError> {
        substitute(&self.base_url, properties)
    }

    /// Substitute concrete property values into the collection URL template
    /// (relevant for nested resources, whose parent pks live there).
    pub fn collection_url(&self, properties: &Properties) -> Result<String, ApiError> {
        substitute(&self.base_url_sans_pks, properties)
    }
}

impl std::fmt::Debug for ResourceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClass")
            .field("name", &self.name)
            .field("resource_name", &self.resource_name)
            .field("pks", &self.pks)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn validate(config: &ResourceConfig) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidResource {
        resource: config.name.clone(),
        message,
    };
    if config.name.is_empty() {
        return Err(ConfigError::InvalidResource {
            resource: "<unnamed>".to_string(),
            message: "resource name must not be empty".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for pk in &config.pks {
        if pk.is_empty() {
            return Err(invalid("primary key names must not be empty".to_string()));
        }
        if !seen.insert(pk.as_str()) {
            return Err(invalid(format!("duplicate primary key '{}'", pk)));
        }
    }
    for relationship in &config.relationships {
        if relationship.name.is_empty() || relationship.relation.is_empty() {
            return Err(invalid(
                "relationships must have a name and a target relation".to_string(),
            ));
        }
    }
    for (action, _) in config.endpoints.entries() {
        if !config.actions.contains_key(action) {
            return Err(invalid(format!(
                "route registered for unknown action '{}'",
                action
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Properties {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn minimal_class_derives_slug_from_name() {
        let class = ResourceClass::new(ResourceConfig::new("SomeResource")).unwrap();
        assert_eq!(class.resource_name(), "some_resource");
        assert_eq!(class.base_url(), "/some_resource");
        assert_eq!(class.base_url_sans_pks(), "/some_resource/");
    }

    #[test]
    fn explicit_resource_name_wins() {
        let class =
            ResourceClass::new(ResourceConfig::new("T2").resource_name("another_resource"))
                .unwrap();
        assert_eq!(class.base_url(), "/another_resource");
    }

    #[test]
    fn namespace_prefixes_the_base_url() {
        let class =
            ResourceClass::new(ResourceConfig::new("FinalResource").namespace("/api")).unwrap();
        assert_eq!(class.base_url(), "/api/final_resource");
    }

    #[test]
    fn messed_up_slashes_are_normalized() {
        let class = ResourceClass::new(
            ResourceConfig::new("DoubleSlash")
                .namespace("/")
                .resource_name("/"),
        )
        .unwrap();
        assert_eq!(class.base_url(), "/");

        let class = ResourceClass::new(
            ResourceConfig::new("DoubleSlash2")
                .namespace("//")
                .resource_name("/double_slash"),
        )
        .unwrap();
        assert_eq!(class.base_url(), "/double_slash");

        let class = ResourceClass::new(
            ResourceConfig::new("DoubleMiddleSlash")
                .namespace("api/")
                .resource_name("//another_resource/"),
        )
        .unwrap();
        assert_eq!(class.base_url(), "/api/another_resource");
    }

    #[test]
    fn append_slash_controls_instance_url_only() {
        let class = ResourceClass::new(
            ResourceConfig::new("Basket")
                .namespace("/api/v1.0")
                .resource_name("basket")
                .pks(["basketid"])
                .append_slash(true),
        )
        .unwrap();
        assert_eq!(class.base_url(), "/api/v1.0/basket/<basketid>/");
        assert_eq!(class.base_url_sans_pks(), "/api/v1.0/basket/");
    }

    #[test]
    fn nested_pks_land_in_the_collection_url() {
        let class = ResourceClass::new(
            ResourceConfig::new("Item")
                .namespace("/api/v1.0")
                .resource_name("basket")
                .pks(["basketid", "itemid"]),
        )
        .unwrap();
        assert_eq!(class.base_url_sans_pks(), "/api/v1.0/basket/<basketid>/");
        assert_eq!(class.base_url(), "/api/v1.0/basket/<basketid>/<itemid>");
    }

    #[test]
    fn instance_url_substitutes_pk_values() {
        let class = ResourceClass::new(
            ResourceConfig::new("Basket")
                .namespace("/api/v1.0")
                .resource_name("basket")
                .pks(["basketid"])
                .append_slash(true),
        )
        .unwrap();
        let url = class.instance_url(&props(json!({"basketid": "123"}))).unwrap();
        assert_eq!(url, "/api/v1.0/basket/123/");
    }

    #[test]
    fn nested_instance_url_has_no_trailing_slash() {
        let class = ResourceClass::new(
            ResourceConfig::new("Item")
                .namespace("/api/v1.0")
                .resource_name("basket")
                .pks(["basketid", "itemid"]),
        )
        .unwrap();
        let url = class
            .instance_url(&props(json!({"basketid": "123", "itemid": "987"})))
            .unwrap();
        assert_eq!(url, "/api/v1.0/basket/123/987");
    }

    #[test]
    fn instance_url_without_pk_value_fails() {
        let class =
            ResourceClass::new(ResourceConfig::new("Basket").pks(["basketid"])).unwrap();
        let err = class.instance_url(&props(json!({}))).unwrap_err();
        match err {
            ApiError::MissingProperty { field } => assert_eq!(field, "basketid"),
            other => panic!("expected MissingProperty, got {other}"),
        }
    }

    #[test]
    fn duplicate_pks_are_rejected_at_construction() {
        let err = ResourceClass::new(ResourceConfig::new("Broken").pks(["id", "id"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidResource { .. }));
    }

    #[test]
    fn extended_config_recomputes_the_slug() {
        let parent = ResourceConfig::new("T1");
        let child = parent.extend("T2");
        let parent_class = ResourceClass::new(parent).unwrap();
        let child_class = ResourceClass::new(child).unwrap();
        assert_eq!(parent_class.base_url(), "/t1");
        assert_eq!(child_class.base_url(), "/t2");
    }
}
