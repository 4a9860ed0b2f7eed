//! Relationship resolution: turn a class's declared relationships and one
//! instance's properties into concrete hrefs on the related classes.
//!
//! Resolution is read-only against the registry and fails loudly: an
//! unregistered target is [`ApiError::UnknownRelation`], a missing source
//! value is [`ApiError::MissingProperty`] naming the key. Links come back
//! in declaration order.

use crate::error::ApiError;
use crate::manager::Properties;
use crate::registry::Registry;
use crate::resource::{RelationKind, ResourceClass};
use serde_json::Value;

/// One resolved href, with the element's properties attached for to-many
/// links that embed their targets.
#[derive(Clone, Debug)]
pub struct Link {
    pub href: String,
    pub embedded: Option<Properties>,
}

#[derive(Clone, Debug)]
pub enum ResolvedLink {
    One(Link),
    Many(Vec<Link>),
}

/// Link name -> resolved link, ordered by relationship declaration.
pub type ResolvedLinks = Vec<(String, ResolvedLink)>;

pub fn resolve_links(
    class: &ResourceClass,
    properties: &Properties,
    registry: &Registry,
) -> Result<ResolvedLinks, ApiError> {
    let mut links = ResolvedLinks::with_capacity(class.relationships().len());
    for relationship in class.relationships() {
        let target = registry
            .get(&relationship.relation)
            .ok_or_else(|| ApiError::UnknownRelation {
                relation: relationship.relation.clone(),
            })?;
        tracing::debug!(
            resource = class.name(),
            link = %relationship.name,
            target = target.name(),
            "resolving relationship"
        );
        let resolved = match &relationship.kind {
            RelationKind::ToOne => {
                let target_props = relationship.target_properties(properties, target.pks())?;
                ResolvedLink::One(Link {
                    href: target.instance_url(&target_props)?,
                    embedded: None,
                })
            }
            RelationKind::ToMany { source } => {
                let list = properties
                    .get(source)
                    .ok_or_else(|| ApiError::MissingProperty {
                        field: source.clone(),
                    })?;
                let elements = list.as_array().ok_or_else(|| ApiError::Validation {
                    field: source.clone(),
                    message: "must be a list".to_string(),
                })?;
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    let element_props = match element {
                        Value::Object(map) => map,
                        _ => {
                            return Err(ApiError::Validation {
                                field: source.clone(),
                                message: "list elements must be objects".to_string(),
                            })
                        }
                    };
                    let target_props =
                        relationship.target_properties(element_props, target.pks())?;
                    items.push(Link {
                        href: target.instance_url(&target_props)?,
                        embedded: Some(element_props.clone()),
                    });
                }
                ResolvedLink::Many(items)
            }
        };
        links.push((relationship.name.clone(), resolved));
    }
    Ok(links)
}
