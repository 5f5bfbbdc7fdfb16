//! Switchyard - one-shot HTTP dispatcher
//!
//! Accepts TCP connections, parses one request per connection and either
//! serves a static file from the document root or hands the request to a
//! named text service.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod service;
