//! File serving capabilities.
//!
//! A [`FileServer`] performs the actual byte transfer for a request once a
//! handler has resolved the filesystem path: status code, headers and body
//! all come from here. [`DiskFileServer`](disk::DiskFileServer) is the
//! production implementation; [`Logging`](logging::Logging) wraps any file
//! server into another one that records each serve call.

use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use http_body::Empty;

use crate::ResponseBody;

pub mod disk;
pub mod logging;

/// Capability for serving the bytes of a resolved filesystem path.
///
/// Handlers own the file server they were constructed with and invoke it
/// once per request; implementations hold no per-request state.
pub trait FileServer {
    /// Serve `path` for `req`.
    ///
    /// Missing or unreadable paths must surface as a `404` response rather
    /// than an error; only I/O failures without an HTTP rendering are
    /// returned as `Err`.
    fn serve(
        &self,
        req: Request<Empty<Bytes>>,
        path: PathBuf,
    ) -> BoxFuture<'static, io::Result<Response<ResponseBody>>>;
}
