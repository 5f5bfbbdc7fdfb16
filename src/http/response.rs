use std::collections::HashMap;

use bytes::Bytes;

/// HTTP status codes the dispatcher produces.
///
/// - `Ok` (200): file served, or any application response
/// - `BadRequest` (400): malformed request line, header or length
/// - `NotFound` (404): static file missing or outside the document root
/// - `MethodNotAllowed` (405): static request that is neither GET nor POST
/// - `InternalServerError` (500): static file exists but could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchyard::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

pub const NOT_FOUND_PAGE: &str = "<html><body><h1>File Not Found</h1></body></html>";

/// A complete HTTP response, built by exactly one handler and written once.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body, absent for header-only responses
    pub body: Option<Bytes>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use switchyard::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("Echo: hi")
///     .build();
///
/// assert_eq!(response.header("Content-Length"), Some("8"));
/// assert_eq!(response.header("Connection"), Some("close"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    content_length: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
            content_length: true,
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Leaves out Content-Length; the body then ends when the connection
    /// closes.
    pub fn close_delimited(mut self) -> Self {
        self.content_length = false;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Connection: close`, and Content-Length from the body size
    /// unless one was set explicitly or the response is close-delimited.
    pub fn build(mut self) -> Response {
        self.headers
            .entry("Connection".to_string())
            .or_insert_with(|| "close".to_string());

        if self.content_length {
            let len = self.body.as_ref().map_or(0, Bytes::len);
            self.headers
                .entry("Content-Length".to_string())
                .or_insert_with(|| len.to_string());
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK with a `text/plain` body.
    pub fn text(body: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body(body.into())
            .build()
    }

    /// 200 OK with a `text/html` body.
    pub fn html(body: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html")
            .body(body.into())
            .build()
    }

    /// 404 page for static requests. Close-delimited.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .header("Content-Type", "text/html")
            .body(NOT_FOUND_PAGE)
            .close_delimited()
            .build()
    }

    pub fn bad_request(reason: impl std::fmt::Display) -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .header("Content-Type", "text/plain")
            .body(format!("400 Bad Request: {}", reason))
            .build()
    }

    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("Content-Type", "text/plain")
            .body("405 Method Not Allowed")
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .header("Content-Type", "text/plain")
            .body("500 Internal Server Error")
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Body bytes, empty when the response has none.
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}
