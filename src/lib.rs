//! Hypermedia SDK: declarative REST resource framework with HAL-style links.
//!
//! Resources are declared as [`ResourceConfig`]s, built into
//! [`ResourceClass`]es with canonical URLs, and registered in an explicit
//! process-wide [`Registry`]. At request time, actions materialize property
//! snapshots whose relationships resolve to hypermedia links against that
//! registry; the [`Dispatcher`] binds everything into an axum router.

pub mod adapter;
pub mod case;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod manager;
pub mod mixins;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod url;
pub mod validation;

pub use adapter::{Adapter, HalAdapter};
pub use dispatch::Dispatcher;
pub use endpoint::{ActionFn, ActionInput, ActionSpec, EndpointTable, RouteDescriptor, RouteOptions};
pub use error::{ApiError, ConfigError};
pub use manager::{InMemoryManager, Manager, Properties};
pub use registry::Registry;
pub use resolver::{resolve_links, Link, ResolvedLink, ResolvedLinks};
pub use resource::{RelationKind, Relationship, ResourceClass, ResourceConfig, ResourceInstance};
pub use validation::{translate_and_validate, ArgType, FieldKind, FieldSpec};
