//! Typed per-resource configuration. Everything the original expressed as
//! class attributes lives here as named fields, validated when the
//! resource class is built.

use crate::endpoint::{ActionFn, ActionSpec, EndpointTable, RouteDescriptor};
use crate::manager::Manager;
use crate::resource::Relationship;
use crate::validation::FieldSpec;
use std::collections::HashMap;
use std::sync::Arc;

/// Declarative configuration for one resource type. Built fluently, then
/// turned into a [`ResourceClass`](crate::resource::ResourceClass) once at
/// startup.
#[derive(Clone, Default)]
pub struct ResourceConfig {
    pub(crate) name: String,
    pub(crate) resource_name: Option<String>,
    pub(crate) namespace: String,
    pub(crate) pks: Vec<String>,
    pub(crate) append_slash: bool,
    pub(crate) is_abstract: bool,
    pub(crate) relationships: Vec<Relationship>,
    pub(crate) endpoints: EndpointTable,
    pub(crate) actions: HashMap<String, ActionSpec>,
    pub(crate) manager: Option<Arc<dyn Manager>>,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        ResourceConfig {
            name: name.into(),
            namespace: "/".to_string(),
            ..ResourceConfig::default()
        }
    }

    /// Derive a new configuration from this one, as subclassing would.
    /// Endpoint entries, actions, and relationships are copied, never
    /// shared; the resource name is recomputed from the new name unless it
    /// was set explicitly.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        let mut derived = self.clone();
        derived.name = name.into();
        derived.endpoints = self.endpoints.inherit();
        derived
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    pub fn pks<I, S>(mut self, pks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pks = pks.into_iter().map(Into::into).collect();
        self
    }

    pub fn append_slash(mut self, append_slash: bool) -> Self {
        self.append_slash = append_slash;
        self
    }

    /// Abstract resources compute URLs for inheritance but are never
    /// registered and never checked for endpoint uniqueness.
    pub fn abstract_resource(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn manager(mut self, manager: Arc<dyn Manager>) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Attach an action handler and one route for it.
    pub fn action(
        mut self,
        name: impl Into<String>,
        descriptor: RouteDescriptor,
        handler: ActionFn,
    ) -> Self {
        let name = name.into();
        self.endpoints.add(name.clone(), descriptor);
        self.actions.insert(name, ActionSpec::new(handler));
        self
    }

    /// Attach an action whose inputs are translated and validated against
    /// the field descriptors before the handler runs.
    pub fn action_with_fields(
        mut self,
        name: impl Into<String>,
        descriptor: RouteDescriptor,
        handler: ActionFn,
        fields: Vec<FieldSpec>,
    ) -> Self {
        let name = name.into();
        self.endpoints.add(name.clone(), descriptor);
        self.actions
            .insert(name, ActionSpec::with_fields(handler, fields));
        self
    }

    /// Add a route for an action registered earlier (or on an ancestor).
    pub fn route(mut self, action: impl Into<String>, descriptor: RouteDescriptor) -> Self {
        self.endpoints.add(action, descriptor);
        self
    }
}
