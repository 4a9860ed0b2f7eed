//! Endpoint descriptors: the per-class table of (route, endpoint name,
//! options) entries behind each action, plus the action handler types the
//! dispatcher invokes.
//!
//! Tables are plain owned data. Inheriting a table always copies the
//! backing entries, so adding a route on a derived resource never mutates
//! an ancestor's table.

use crate::error::ApiError;
use crate::manager::Properties;
use crate::resource::{ResourceClass, ResourceInstance};
use crate::validation::FieldSpec;
use axum::http::Method;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Raw request parameters handed to an action: URL path values, query
/// string values, and the JSON body, each as a property map.
#[derive(Clone, Debug, Default)]
pub struct ActionInput {
    pub url_params: Properties,
    pub query_args: Properties,
    pub body_args: Properties,
}

pub type ActionFuture = Pin<Box<dyn Future<Output = Result<ResourceInstance, ApiError>> + Send>>;

/// An action handler: receives its resource class and the (translated)
/// request parameters, returns a materialized resource instance.
pub type ActionFn = Arc<dyn Fn(Arc<ResourceClass>, ActionInput) -> ActionFuture + Send + Sync>;

/// Handler plus the field descriptors validated before it runs.
#[derive(Clone)]
pub struct ActionSpec {
    pub handler: ActionFn,
    pub fields: Vec<FieldSpec>,
}

impl ActionSpec {
    pub fn new(handler: ActionFn) -> Self {
        ActionSpec {
            handler,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(handler: ActionFn, fields: Vec<FieldSpec>) -> Self {
        ActionSpec { handler, fields }
    }
}

/// Per-route options: permitted HTTP methods, whether the route binds to
/// the collection URL (no pk segments), and free-form extras for adapters.
#[derive(Clone, Debug)]
pub struct RouteOptions {
    pub methods: Vec<Method>,
    pub no_pks: bool,
    pub extra: Properties,
}

impl Default for RouteOptions {
    fn default() -> Self {
        RouteOptions {
            methods: vec![Method::GET],
            no_pks: false,
            extra: Properties::new(),
        }
    }
}

/// One route bound to an action: a template suffix relative to the class
/// base URL, an optional endpoint name, and options.
#[derive(Clone, Debug)]
pub struct RouteDescriptor {
    pub route: String,
    pub endpoint: Option<String>,
    pub options: RouteOptions,
}

impl RouteDescriptor {
    pub fn new(route: impl Into<String>) -> Self {
        RouteDescriptor {
            route: route.into(),
            endpoint: None,
            options: RouteOptions::default(),
        }
    }

    pub fn endpoint(mut self, name: impl Into<String>) -> Self {
        self.endpoint = Some(name.into());
        self
    }

    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.options.methods = methods.into_iter().collect();
        self
    }

    /// Bind this route to the collection URL instead of the instance URL.
    pub fn no_pks(mut self) -> Self {
        self.options.no_pks = true;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.extra.insert(key.into(), value);
        self
    }
}

/// Ordered per-class route table: action name -> descriptors.
#[derive(Clone, Debug, Default)]
pub struct EndpointTable {
    entries: Vec<(String, RouteDescriptor)>,
}

impl EndpointTable {
    pub fn new() -> Self {
        EndpointTable::default()
    }

    pub fn add(&mut self, action: impl Into<String>, descriptor: RouteDescriptor) {
        let action = action.into();
        tracing::debug!(action = %action, route = %descriptor.route, "registering endpoint");
        self.entries.push((action, descriptor));
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[(String, RouteDescriptor)] {
        &self.entries
    }

    /// Explicit copy for a derived resource; the copy owns its entries.
    pub fn inherit(&self) -> EndpointTable {
        self.clone()
    }

    /// Action name -> routes, reflecting exactly this table's entries.
    pub fn endpoint_dictionary(&self) -> HashMap<&str, Vec<&RouteDescriptor>> {
        let mut dictionary: HashMap<&str, Vec<&RouteDescriptor>> = HashMap::new();
        for (action, descriptor) in &self.entries {
            dictionary.entry(action.as_str()).or_default().push(descriptor);
        }
        dictionary
    }
}
