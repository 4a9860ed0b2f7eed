//! Example consumer: a separate Rust project that uses hypermedia-sdk as a
//! dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`

use hypermedia_sdk::{
    mixins, Dispatcher, InMemoryManager, Manager, Registry, ResourceClass, ResourceConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hypermedia_sdk=info")),
        )
        .init();

    let people: Arc<dyn Manager> = Arc::new(InMemoryManager::new(["id"]));
    let mut registry = Registry::new();
    registry.register(ResourceClass::new(mixins::with_crud(
        ResourceConfig::new("Person")
            .namespace("/api/v1.0")
            .pks(["id"])
            .manager(people),
    ))?)?;

    let app = Dispatcher::new("/", Arc::new(registry)).into_router()?;
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    let port = listener.local_addr()?.port();
    tracing::info!("Example consumer listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
