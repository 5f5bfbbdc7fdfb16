use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::service::{ECHO, HELLO, ServiceRegistry};

pub const SERVICE_UNAVAILABLE: &str = "Error: service unavailable";
pub const METHOD_NOT_SUPPORTED: &str = "Error: method not supported";

/// Handles a request under the application prefix.
///
/// GET hands the full target, query included, to `hello`. POST hands the
/// body to `echo`. Method case is ignored here. The status is 200 either
/// way; failures travel in the text.
pub fn dispatch(services: &ServiceRegistry, req: &Request) -> Response {
    let text = match req.method.ignoring_case() {
        Method::GET => call(services, HELLO, &req.target),
        Method::POST => call(services, ECHO, &req.body_text()),
        Method::Other(_) => METHOD_NOT_SUPPORTED.to_string(),
    };

    Response::text(text)
}

fn call(services: &ServiceRegistry, name: &str, payload: &str) -> String {
    match services.get(name) {
        Some(service) => {
            tracing::debug!(service = name, "Dispatching to service");
            service.respond(payload)
        }
        None => {
            tracing::warn!(service = name, "Service not registered");
            SERVICE_UNAVAILABLE.to_string()
        }
    }
}
