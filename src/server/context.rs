use tokio::sync::watch;

use crate::config::Config;
use crate::router::Router;
use crate::service::ServiceRegistry;

/// State shared by the acceptor and every connection worker.
///
/// Built once by the entry point and passed around behind an `Arc`. The
/// only thing that changes after construction is the stop flag.
#[derive(Debug)]
pub struct ServerContext {
    config: Config,
    router: Router,
    stop: watch::Sender<bool>,
}

impl ServerContext {
    pub fn new(config: Config, services: ServiceRegistry) -> Self {
        let router = Router::from_config(&config, services);
        let (stop, _) = watch::channel(false);

        Self {
            config,
            router,
            stop,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Asks the acceptor to stop. Connections already accepted finish.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_running(&self) -> bool {
        !*self.stop.borrow()
    }

    pub fn subscribe_stop(&self) -> watch::Receiver<bool> {
        self.stop.subscribe()
    }
}
