//! Resource class model: declarative configuration, the computed class,
//! relationships, and materialized instances.

mod class;
mod config;
mod instance;
mod relationship;

pub use class::ResourceClass;
pub use config::ResourceConfig;
pub use instance::ResourceInstance;
pub use relationship::{RelationKind, Relationship};
