//! Prebuilt CRUD-style actions over a resource's manager: create on the
//! collection URL, retrieve on the instance URL, list on the collection
//! URL. Attach the ones a resource supports and add bespoke actions
//! alongside.

use crate::endpoint::{ActionFn, ActionInput, RouteDescriptor};
use crate::error::ApiError;
use crate::manager::{Manager, Properties};
use crate::resource::{ResourceClass, ResourceConfig, ResourceInstance};
use axum::http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Property name the list action stores its records under; a
/// `Relationship::list(..).source(LIST_PROPERTY)` links the elements.
pub const LIST_PROPERTY: &str = "items";

/// POST on the collection URL, delegating to `Manager::create`.
pub fn with_create(config: ResourceConfig) -> ResourceConfig {
    config.action(
        "create",
        RouteDescriptor::new("").methods([Method::POST]).no_pks(),
        create_action(),
    )
}

/// GET on the instance URL, delegating to `Manager::retrieve`.
pub fn with_retrieve(config: ResourceConfig) -> ResourceConfig {
    config.action("retrieve", RouteDescriptor::new(""), retrieve_action())
}

/// GET on the collection URL, delegating to `Manager::retrieve_list`.
pub fn with_retrieve_list(config: ResourceConfig) -> ResourceConfig {
    config.action(
        "retrieve_list",
        RouteDescriptor::new("").no_pks(),
        retrieve_list_action(),
    )
}

/// All three standard actions.
pub fn with_crud(config: ResourceConfig) -> ResourceConfig {
    with_retrieve_list(with_retrieve(with_create(config)))
}

fn require_manager(class: &ResourceClass) -> Result<Arc<dyn Manager>, ApiError> {
    class.manager().cloned().ok_or_else(|| {
        ApiError::BadRequest(format!("resource '{}' has no manager", class.name()))
    })
}

fn create_action() -> ActionFn {
    Arc::new(|class, input: ActionInput| {
        Box::pin(async move {
            let manager = require_manager(&class)?;
            let properties = manager.create(input.body_args).await?;
            Ok(ResourceInstance::new(class, properties))
        })
    })
}

fn retrieve_action() -> ActionFn {
    Arc::new(|class, input: ActionInput| {
        Box::pin(async move {
            let manager = require_manager(&class)?;
            let properties = manager
                .retrieve(input.url_params)
                .await?
                .ok_or_else(|| ApiError::NotFound(class.resource_name().to_string()))?;
            Ok(ResourceInstance::new(class, properties))
        })
    })
}

fn retrieve_list_action() -> ActionFn {
    Arc::new(|class, input: ActionInput| {
        Box::pin(async move {
            let manager = require_manager(&class)?;
            // Path values (parent pks on nested collections) filter along
            // with the query string.
            let mut filters = input.url_params;
            filters.extend(input.query_args);
            let (records, meta) = manager.retrieve_list(filters).await?;
            let mut properties = Properties::new();
            properties.insert(
                LIST_PROPERTY.to_string(),
                Value::Array(records.into_iter().map(Value::Object).collect()),
            );
            if let Some(meta) = meta {
                properties.insert("meta".to_string(), meta);
            }
            Ok(ResourceInstance::collection(class, properties))
        })
    })
}
