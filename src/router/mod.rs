//! Request routing.
//!
//! Targets under the application prefix go to a named service (see
//! [`app`]); everything else is a static file under the document root (see
//! [`static_files`]). The router also decides how a request body is framed,
//! since the two POST paths read their payloads differently.

pub mod app;
pub mod static_files;

use crate::config::Config;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::service::ServiceRegistry;

pub use static_files::StaticFiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    App,
    Static,
}

/// How the connection worker reads a request payload after the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    None,
    /// Exactly Content-Length bytes.
    ContentLength,
    /// Lines until an empty one, EOF, or an idle gap.
    UntilBlankLine,
}

#[derive(Debug)]
pub struct Router {
    app_prefix: String,
    services: ServiceRegistry,
    static_files: StaticFiles,
}

impl Router {
    pub fn new(app_prefix: impl Into<String>, services: ServiceRegistry, static_files: StaticFiles) -> Self {
        Self {
            app_prefix: app_prefix.into(),
            services,
            static_files,
        }
    }

    pub fn from_config(config: &Config, services: ServiceRegistry) -> Self {
        Self::new(
            config.app.prefix.clone(),
            services,
            StaticFiles::new(&config.static_files.root),
        )
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn static_files(&self) -> &StaticFiles {
        &self.static_files
    }

    pub fn classify(&self, target: &str) -> Route {
        if target.starts_with(&self.app_prefix) {
            Route::App
        } else {
            Route::Static
        }
    }

    pub fn body_framing(&self, method: &Method, target: &str) -> BodyFraming {
        match self.classify(target) {
            Route::App if method.ignoring_case() == Method::POST => BodyFraming::ContentLength,
            Route::Static if *method == Method::POST => BodyFraming::UntilBlankLine,
            _ => BodyFraming::None,
        }
    }

    /// Produces the single response for `req`. Never fails: every problem
    /// below this point is expressed as a response.
    pub async fn route(&self, req: &Request) -> Response {
        match self.classify(&req.target) {
            Route::App => app::dispatch(&self.services, req),
            Route::Static => match &req.method {
                Method::GET => self.static_files.get(req.path()).await,
                Method::POST => StaticFiles::post(&req.body_text()),
                Method::Other(token) => {
                    tracing::debug!(method = %token, path = %req.target, "Unsupported method for static path");
                    Response::method_not_allowed()
                }
            },
        }
    }
}
