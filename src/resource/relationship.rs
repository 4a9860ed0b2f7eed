//! Relationship descriptors: named, directional edges from a resource's
//! properties to another registered resource class.

use crate::error::ApiError;
use crate::manager::Properties;

/// To-one resolves a single href from the instance's own properties.
/// To-many reads a list-valued source property and resolves one href per
/// element, embedding the element's properties alongside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationKind {
    ToOne,
    ToMany { source: String },
}

/// An edge to the resource class registered under `relation`. The
/// `property_map` remaps source property names to target primary-key names;
/// absent entries fall back to identity.
#[derive(Clone, Debug)]
pub struct Relationship {
    pub name: String,
    pub relation: String,
    pub property_map: Vec<(String, String)>,
    pub kind: RelationKind,
}

impl Relationship {
    pub fn new(name: impl Into<String>, relation: impl Into<String>) -> Self {
        Relationship {
            name: name.into(),
            relation: relation.into(),
            property_map: Vec::new(),
            kind: RelationKind::ToOne,
        }
    }

    /// A to-many relationship reading its elements from the property named
    /// like the relationship itself (override with [`Relationship::source`]).
    pub fn list(name: impl Into<String>, relation: impl Into<String>) -> Self {
        let name = name.into();
        Relationship {
            kind: RelationKind::ToMany {
                source: name.clone(),
            },
            name,
            relation: relation.into(),
            property_map: Vec::new(),
        }
    }

    /// Remap one source property name to a target primary-key name.
    pub fn map(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.property_map.push((source.into(), target.into()));
        self
    }

    /// For to-many relationships, the list-valued property to read from.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        if let RelationKind::ToMany { .. } = self.kind {
            self.kind = RelationKind::ToMany {
                source: source.into(),
            };
        }
        self
    }

    /// The source property name feeding a given target primary key:
    /// the mapped name if declared, the target name itself otherwise.
    pub fn source_for<'a>(&'a self, target_key: &'a str) -> &'a str {
        self.property_map
            .iter()
            .find(|(_, target)| target == target_key)
            .map(|(source, _)| source.as_str())
            .unwrap_or(target_key)
    }

    /// Build the target's property map for URL substitution: one value per
    /// target primary key, read through the property map with identity
    /// fallback. Fails naming the missing source key.
    pub fn target_properties(
        &self,
        properties: &Properties,
        target_pks: &[String],
    ) -> Result<Properties, ApiError> {
        let mut out = Properties::new();
        for pk in target_pks {
            let source = self.source_for(pk);
            let value = properties
                .get(source)
                .ok_or_else(|| ApiError::MissingProperty {
                    field: source.to_string(),
                })?;
            out.insert(pk.clone(), value.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Properties {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn source_for_prefers_the_mapped_name() {
        let rel = Relationship::new("sel", "ItemSelection").map("basket_relation", "basketid");
        assert_eq!(rel.source_for("basketid"), "basket_relation");
        assert_eq!(rel.source_for("itemid"), "itemid");
    }

    #[test]
    fn identity_fallback_reads_target_name() {
        let rel = Relationship::new("item", "Item");
        let out = rel
            .target_properties(&props(json!({"itemid": "987"})), &["itemid".into()])
            .unwrap();
        assert_eq!(out["itemid"], json!("987"));
    }

    #[test]
    fn property_map_reads_source_name() {
        let rel = Relationship::new("basket_relation", "Basket").map("basket_relation", "basketid");
        let out = rel
            .target_properties(
                &props(json!({"basketid": "123", "basket_relation": "456"})),
                &["basketid".into()],
            )
            .unwrap();
        assert_eq!(out["basketid"], json!("456"));
    }

    #[test]
    fn missing_source_names_the_mapped_key() {
        let rel = Relationship::new("other", "Other").map("value_1", "value_1_translated");
        let err = rel
            .target_properties(&props(json!({})), &["value_1_translated".into()])
            .unwrap_err();
        match err {
            ApiError::MissingProperty { field } => assert_eq!(field, "value_1"),
            other => panic!("expected MissingProperty, got {other}"),
        }
    }
}
