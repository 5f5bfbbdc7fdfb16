use std::collections::HashMap;
use std::sync::Arc;

use crate::service::Service;

/// Name to service mapping.
///
/// Filled once before the acceptor starts, then only read. Workers share it
/// through the server context without any locking.
#[derive(Default, Clone)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service under `name`. Names are unique.
    pub fn register(&mut self, name: impl Into<String>, service: impl Service + 'static) -> anyhow::Result<()> {
        let name = name.into();
        if self.services.contains_key(&name) {
            anyhow::bail!("service {:?} is already registered", name);
        }

        tracing::debug!(service = %name, "Registered service");
        self.services.insert(name, Arc::new(service));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Service> {
        self.services.get(name).map(|service| service.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}
