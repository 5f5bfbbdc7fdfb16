use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio::time::timeout;

use crate::http::request::Method;

/// Longest accepted request, header or payload line, terminator included.
pub const MAX_LINE_LEN: usize = 8 * 1024;
pub const MAX_HEADERS: usize = 100;
pub const MAX_BODY_LEN: usize = 1024 * 1024;

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Timeout,
    InvalidRequestLine,
    InvalidContentLength,
    LineTooLong,
    TooManyHeaders,
    BodyTooLarge,
    UnexpectedEof,
}

impl ParseError {
    /// Whether the peer can still be answered.
    ///
    /// Transport failures only allow closing the socket; everything else is
    /// a malformed request that gets a 400.
    pub fn is_connection_level(&self) -> bool {
        matches!(
            self,
            ParseError::Io(_) | ParseError::Timeout | ParseError::UnexpectedEof
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "i/o error: {}", e),
            ParseError::Timeout => f.write_str("timed out waiting for the request"),
            ParseError::InvalidRequestLine => f.write_str("malformed request line"),
            ParseError::InvalidContentLength => f.write_str("malformed Content-Length"),
            ParseError::LineTooLong => f.write_str("request line or header too long"),
            ParseError::TooManyHeaders => f.write_str("too many header lines"),
            ParseError::BodyTooLarge => f.write_str("request body too large"),
            ParseError::UnexpectedEof => f.write_str("connection closed mid-request"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// The three tokens of `METHOD SP TARGET SP VERSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: String,
}

pub fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let target = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = parts.next().unwrap_or("HTTP/1.0");

    Ok(RequestLine {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Splits `Name: value`. Lines without a colon carry nothing we use.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

/// Reads one line, without its `\r\n` or `\n` terminator.
///
/// Returns `Ok(None)` when the stream is already exhausted. A final line
/// cut off by EOF is returned as-is.
pub async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = reader
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    if !strip_terminator(&mut buf) && n == MAX_LINE_LEN {
        return Err(ParseError::LineTooLong);
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Drops a trailing `\n` or `\r\n`. Returns whether one was present.
fn strip_terminator(buf: &mut Vec<u8>) -> bool {
    if buf.last() != Some(&b'\n') {
        return false;
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    true
}

/// Consumes header lines up to the blank separator line or EOF.
pub async fn read_headers<R>(reader: &mut R) -> Result<Vec<(String, String)>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Vec::new();
    let mut seen = 0usize;

    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }

        seen += 1;
        if seen > MAX_HEADERS {
            return Err(ParseError::TooManyHeaders);
        }

        match parse_header_line(&line) {
            Some(header) => headers.push(header),
            None => tracing::debug!(line = %line, "Ignoring header line without ':'"),
        }
    }

    Ok(headers)
}

/// Reads exactly `len` body bytes.
pub async fn read_body<R>(reader: &mut R, len: usize) -> Result<Vec<u8>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    if len > MAX_BODY_LEN {
        return Err(ParseError::BodyTooLarge);
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ParseError::UnexpectedEof
        } else {
            ParseError::Io(e)
        }
    })?;

    Ok(body)
}

/// Collects payload lines until an empty line, EOF, or `idle` passes
/// without the current line completing. Lines are concatenated as-is; a
/// line cut short by EOF or the idle gap is kept.
pub async fn read_payload_lines<R>(reader: &mut R, idle: Duration) -> Result<String, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut payload = String::new();

    loop {
        let mut line = Vec::new();
        // read_until keeps partial bytes in `line` when the timeout fires.
        let read = timeout(
            idle,
            (&mut *reader)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut line),
        )
        .await;

        if let Ok(n) = read {
            n?;
        }

        let complete = strip_terminator(&mut line);
        if line.is_empty() {
            break;
        }
        if !complete && line.len() == MAX_LINE_LEN {
            return Err(ParseError::LineTooLong);
        }
        if payload.len() + line.len() > MAX_BODY_LEN {
            return Err(ParseError::BodyTooLarge);
        }

        payload.push_str(&String::from_utf8_lossy(&line));

        if !complete {
            break;
        }
    }

    Ok(payload)
}
