use std::io;
use std::path::PathBuf;
use std::time::Instant;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use http_body::Empty;
use tracing::{info, warn};

use super::FileServer;
use crate::ResponseBody;

/// [`FileServer`] decorator recording each serve call.
///
/// Logs method, request path, response status and elapsed time through the
/// [`tracing`] facade. The wrapped server's response passes through
/// untouched, so composing this decorator never changes what a client
/// observes.
#[derive(Debug, Clone)]
pub struct Logging<FS> {
    inner: FS,
}

impl<FS> Logging<FS> {
    /// Wrap `inner`, logging around every serve call.
    pub fn new(inner: FS) -> Self {
        Self { inner }
    }
}

impl<FS> FileServer for Logging<FS>
where
    FS: FileServer,
{
    fn serve(
        &self,
        req: Request<Empty<Bytes>>,
        path: PathBuf,
    ) -> BoxFuture<'static, io::Result<Response<ResponseBody>>> {
        let method = req.method().clone();
        let uri_path = req.uri().path().to_owned();
        let inner = self.inner.serve(req, path);

        Box::pin(async move {
            let start = Instant::now();
            let result = inner.await;

            match &result {
                Ok(response) => info!(
                    method = %method,
                    path = %uri_path,
                    status = response.status().as_u16(),
                    elapsed = ?start.elapsed(),
                    "served"
                ),
                Err(err) => warn!(
                    method = %method,
                    path = %uri_path,
                    error = %err,
                    elapsed = ?start.elapsed(),
                    "serve failed"
                ),
            }

            result
        })
    }
}
