use std::sync::Arc;

use switchyard::config::Config;
use switchyard::server::{Server, ServerContext};
use switchyard::service::{self, ServiceRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let mut registry = ServiceRegistry::new();
    service::register_defaults(&mut registry)?;
    tracing::info!(services = ?registry.names(), "Services registered");

    let ctx = Arc::new(ServerContext::new(cfg, registry));
    let server = Server::bind(Arc::clone(&ctx)).await?;
    let mut serving = tokio::spawn(server.run());

    tokio::select! {
        res = &mut serving => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            ctx.stop();
            serving.await??;
        }
    }

    Ok(())
}
