//! HTTP protocol subset.
//!
//! One request per connection, no keep-alive, no chunked bodies.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection worker and its state machine
//! - **`parser`**: request line, header and body readers over a buffered stream
//! - **`request`**: the parsed request
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serialises and writes a response to the client
//! - **`mime`**: Content-Type by file extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers, routed body
//!        └──────┬──────┘
//!               │ Request parsed            (peer gone → Closed)
//!               ▼                           (malformed → Writing 400)
//!        ┌──────────────────┐
//!        │   Processing     │ ← router: service or static file
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← whole response, then flush
//!        └──────┬───────────┘
//!               ▼
//!            Closed          ← socket shut down unconditionally
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
