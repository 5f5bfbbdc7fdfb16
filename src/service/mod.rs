//! Named text services reachable through the application prefix.
//!
//! A [`Service`] maps one text payload to one text response. It never
//! touches the connection and never fails at the protocol level: problems
//! such as a missing field come back as descriptive text.

pub mod echo;
pub mod hello;
pub mod registry;

pub use echo::EchoService;
pub use hello::HelloService;
pub use registry::ServiceRegistry;

/// Name the router uses for GET requests under the application prefix.
pub const HELLO: &str = "hello";

/// Name the router uses for POST requests under the application prefix.
pub const ECHO: &str = "echo";

pub trait Service: Send + Sync {
    fn respond(&self, payload: &str) -> String;
}

impl<F> Service for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn respond(&self, payload: &str) -> String {
        self(payload)
    }
}

/// Registers the `hello` and `echo` services.
pub fn register_defaults(registry: &mut ServiceRegistry) -> anyhow::Result<()> {
    registry.register(HELLO, HelloService)?;
    registry.register(ECHO, EchoService::new()?)?;
    Ok(())
}
