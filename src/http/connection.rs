use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use crate::http::parser::{self, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::BodyFraming;
use crate::server::context::ServerContext;

/// One accepted connection, served for exactly one request.
pub struct Connection<S> {
    stream: BufReader<S>,
    peer: String,
    ctx: Arc<ServerContext>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream: BufReader::new(stream),
            peer: peer.into(),
            ctx,
            state: ConnectionState::Reading,
        }
    }

    /// Reads, routes, answers and closes. The socket is shut down whatever
    /// the outcome of the earlier steps.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %e, "Shutdown after response failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(Some(req)) => ConnectionState::Processing(req),
                    Ok(None) => {
                        tracing::debug!(peer = %self.peer, "Peer closed before sending a request");
                        ConnectionState::Closed
                    }
                    Err(e) if e.is_connection_level() => {
                        tracing::warn!(peer = %self.peer, error = %e, "Dropping connection");
                        ConnectionState::Closed
                    }
                    Err(e) => {
                        tracing::warn!(peer = %self.peer, error = %e, "Malformed request");
                        ConnectionState::Writing(ResponseWriter::new(&Response::bad_request(&e)))
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = self.ctx.router().route(&req).await;

                    tracing::info!(
                        peer = %self.peer,
                        method = %req.method.as_str(),
                        path = %req.target,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Request line, headers, then whatever body the route calls for, all
    /// under one `read_timeout` deadline.
    ///
    /// `Ok(None)` means the peer went away (or sent an empty line) before
    /// a request line arrived.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        let limit = self.ctx.config().server.read_timeout();
        within(limit, self.read_request_unbounded()).await
    }

    async fn read_request_unbounded(&mut self) -> Result<Option<Request>, ParseError> {
        let ctx = Arc::clone(&self.ctx);

        let line = match parser::read_line(&mut self.stream).await? {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Ok(None),
        };

        let request_line = parser::parse_request_line(&line)?;
        let headers = parser::read_headers(&mut self.stream).await?;

        let mut request = Request {
            method: request_line.method,
            target: request_line.target,
            version: request_line.version,
            headers,
            body: None,
        };

        match ctx.router().body_framing(&request.method, &request.target) {
            BodyFraming::None => {}
            BodyFraming::ContentLength => {
                if let Some(len) = request.content_length()? {
                    tracing::debug!(peer = %self.peer, len, "Reading application body");
                    request.body = Some(parser::read_body(&mut self.stream, len).await?);
                }
            }
            BodyFraming::UntilBlankLine => {
                // The idle gap only ends the payload; the caller's deadline still bounds it.
                let idle = ctx.config().static_files.post_idle_timeout();
                let payload = parser::read_payload_lines(&mut self.stream, idle).await?;
                request.body = Some(payload.into_bytes());
            }
        }

        Ok(Some(request))
    }
}

async fn within<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ParseError>>,
) -> Result<T, ParseError> {
    timeout(limit, fut).await.map_err(|_| ParseError::Timeout)?
}
