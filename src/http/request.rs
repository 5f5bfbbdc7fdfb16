use crate::http::parser::ParseError;

/// HTTP request methods.
///
/// Only GET and POST drive routing decisions. Every other token is kept
/// verbatim so it can be logged and rejected by the handler that sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource, or greet through the application prefix
    GET,
    /// POST - Submit a payload
    POST,
    /// Any other method token, case preserved
    Other(String),
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Method tokens are case-sensitive, so `get` is `Other("get")`.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchyard::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Folds the token to upper case, so `get` becomes `GET`.
    ///
    /// ```
    /// # use switchyard::http::request::Method;
    /// assert_eq!(Method::parse("post").ignoring_case(), Method::POST);
    /// assert_eq!(Method::parse("put").ignoring_case(), Method::Other("PUT".to_string()));
    /// ```
    pub fn ignoring_case(&self) -> Method {
        match self {
            Method::Other(token) => Method::parse(&token.to_ascii_uppercase()),
            known => known.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

/// One parsed request, built once per connection and never mutated by
/// handlers.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target exactly as sent, query included (e.g. "/app?name=x")
    pub target: String,
    /// HTTP version token from the request line
    pub version: String,
    /// Header lines in arrival order as (name, raw value)
    pub headers: Vec<(String, String)>,
    /// Request payload, present only when the route reads one
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target: self.target.ok_or("target missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves the first header value with the given name, compared
    /// ASCII case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parses the Content-Length header.
    ///
    /// Returns `Ok(None)` when the header is absent and
    /// `ParseError::InvalidContentLength` when it is not a number.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.header("Content-Length")
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength)
            })
            .transpose()
    }

    /// The target without its query string or fragment.
    pub fn path(&self) -> &str {
        let end = self
            .target
            .find(['?', '#'])
            .unwrap_or(self.target.len());
        &self.target[..end]
    }

    /// The query string after `?`, if any.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.target.split_once('?')?;
        Some(rest.split('#').next().unwrap_or(rest))
    }

    /// The body as text, empty when no body was read.
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}
