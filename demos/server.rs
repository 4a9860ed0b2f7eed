//! Demo server: registers the shopping-basket resources against an
//! in-memory manager and serves them with hypermedia links.

use hypermedia_sdk::{
    mixins, Dispatcher, InMemoryManager, Manager, Registry, Relationship, ResourceClass,
    ResourceConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hypermedia_sdk=info".parse()?),
        )
        .init();

    let baskets: Arc<dyn Manager> = Arc::new(InMemoryManager::new(["basketid"]));
    let selections: Arc<dyn Manager> = Arc::new(InMemoryManager::new(["basketid", "itemid"]));

    let mut registry = Registry::new();

    // The collection of baskets; list elements link to individual baskets.
    registry.register(ResourceClass::new(mixins::with_retrieve_list(
        ResourceConfig::new("BasketCollection")
            .namespace("/api/v1.0")
            .resource_name("basket")
            .append_slash(true)
            .manager(Arc::clone(&baskets))
            .relationship(
                Relationship::list("baskets_relation", "Basket").source(mixins::LIST_PROPERTY),
            ),
    ))?)?;

    // One basket; links to the item selected into it. Create expects the
    // selected itemid in the body; the basketid is assigned when absent.
    registry.register(ResourceClass::new(mixins::with_retrieve(
        mixins::with_create(
            ResourceConfig::new("Basket")
                .namespace("/api/v1.0")
                .resource_name("basket")
                .pks(["basketid"])
                .append_slash(true)
                .manager(baskets)
                .relationship(
                    Relationship::new("basket_relation", "ItemSelection")
                        .map("basketid", "basketid")
                        .map("itemid", "itemid"),
                ),
        ),
    ))?)?;

    // The selection of an item into a basket; links back to its basket.
    registry.register(ResourceClass::new(mixins::with_retrieve(
        ResourceConfig::new("ItemSelection")
            .namespace("/api/v1.0")
            .resource_name("basket")
            .pks(["basketid", "itemid"])
            .manager(selections)
            .relationship(Relationship::new("basket", "Basket").map("basketid", "basketid")),
    ))?)?;

    let app = Dispatcher::new("", Arc::new(registry)).into_router()?;

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
