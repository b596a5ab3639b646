//! Composable HTTP static file serving handlers.
//!
//! Maps URL paths to files under a base directory ([`Basic`]), optionally
//! mounted under a URL prefix ([`Prefix`]). The byte transfer itself is a
//! [`FileServer`] capability injected into each handler, so decorators such
//! as [`Logging`] can wrap it without knowing its internals, and
//! [`IgnoreIndex`] can wrap whole handlers to suppress direct access to
//! index documents. Server startup goes through [`Listener`] (and
//! [`TlsListener`] with the `tls` feature), whose bind step is injectable
//! for tests.
//!
//! # Example
//! ```
//! use http_handle::{Basic, DiskFileServer, Listener};
//!
//! // This will serve files in the "assets" directory and
//! // its subdirectories
//! let handler = Basic::new(DiskFileServer::new(), "assets");
//!
//! # async {
//! Listener::new()
//!     .listen("127.0.0.1:3000", handler)
//!     .await
//!     .expect("server error");
//! # };
//! ```

use std::io;

use bytes::Bytes;
use http_body::combinators::UnsyncBoxBody;

pub use file_server::disk::DiskFileServer;
pub use file_server::logging::Logging;
pub use file_server::FileServer;
pub use handler::{Basic, IgnoreIndex, Prefix};
#[cfg(feature = "tls")]
pub use listen::RustlsBind;
pub use listen::{Bind, BoxHandler, Listener, TcpBind, TlsBind, TlsListener};

mod body;
pub mod file_server;
pub mod handler;
pub mod listen;
mod response;
#[cfg(test)]
mod tests;

/// Body type produced by every handler and file server in this crate.
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Name of the index document served when a directory is requested.
pub const INDEX_FILE: &str = "index.html";
