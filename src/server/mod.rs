//! Acceptor, worker pool and the shared server context.

pub mod context;
pub mod listener;

pub use context::ServerContext;
pub use listener::Server;
