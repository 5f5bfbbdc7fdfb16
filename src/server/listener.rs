use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, watch};
use tracing::info;

use crate::http::connection::Connection;
use crate::server::context::ServerContext;

/// Bound listener plus the worker pool that serves its connections.
pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    pool: Arc<Semaphore>,
    max_workers: u32,
}

impl Server {
    /// Binds the configured address. Failure here is fatal for the caller.
    pub async fn bind(ctx: Arc<ServerContext>) -> anyhow::Result<Self> {
        ctx.config().validate()?;

        let addr = ctx.config().server.listen_addr.clone();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        let max_workers = u32::try_from(ctx.config().server.max_workers)
            .context("server.max_workers does not fit the worker pool")?;
        info!(addr = %listener.local_addr()?, max_workers, "Listening");

        Ok(Self {
            listener,
            ctx,
            pool: Arc::new(Semaphore::new(max_workers as usize)),
            max_workers,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop.
    ///
    /// A worker permit is taken before each accept, so at most
    /// `max_workers` connections are in flight and a full pool stalls the
    /// loop. Returns once stop was requested and every accepted connection
    /// has finished.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            ctx,
            pool,
            max_workers,
        } = self;
        let mut stop = ctx.subscribe_stop();

        while ctx.is_running() {
            let permit = tokio::select! {
                permit = Arc::clone(&pool).acquire_owned() => permit?,
                _ = stop_requested(&mut stop) => break,
            };

            let (socket, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
                _ = stop_requested(&mut stop) => break,
            };

            info!("Accepted connection from {}", peer);

            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                let _permit = permit;
                let conn = Connection::new(socket, peer.to_string(), ctx);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            });
        }

        drop(listener);
        info!("Stopped accepting connections, waiting for in-flight workers");

        let _drained = pool.acquire_many(max_workers).await?;
        info!("All workers finished");
        Ok(())
    }
}

/// Binds and serves until stopped.
pub async fn run(ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    Server::bind(ctx).await?.run().await
}

async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    while !*stop.borrow_and_update() {
        if stop.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
