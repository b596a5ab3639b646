use std::future::{ready, Ready};
use std::io;
use std::path::PathBuf;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::future::{BoxFuture, Either};
use http::{Request, Response};
use http_body::Empty;
use tower_service::Service;

use super::resolve_path;
use crate::file_server::FileServer;
use crate::{response, ResponseBody};

/// Handler serving files under a base directory.
///
/// Every request path is resolved to `<base_dir><request path>` and handed
/// to the injected [`FileServer`], which produces the complete response.
///
/// # Example
/// ```
/// use http_handle::{Basic, DiskFileServer, Listener};
///
/// let handler = Basic::new(DiskFileServer::new(), "assets");
///
/// # async {
/// Listener::new()
///     .listen("127.0.0.1:3000", handler)
///     .await
///     .expect("server error");
/// # };
/// ```
#[derive(Debug, Clone)]
pub struct Basic<FS> {
    file_server: FS,
    base_dir: PathBuf,
}

impl<FS> Basic<FS> {
    /// Create a handler serving `base_dir` with `file_server`.
    ///
    /// The directory is not validated here; a missing directory surfaces
    /// as not-found on every request.
    pub fn new<P: Into<PathBuf>>(file_server: FS, base_dir: P) -> Self {
        Self {
            file_server,
            base_dir: base_dir.into(),
        }
    }
}

impl<ReqBody, FS> Service<Request<ReqBody>> for Basic<FS>
where
    FS: FileServer,
{
    type Response = Response<ResponseBody>;
    type Error = io::Error;
    type Future = Either<
        Ready<Result<Self::Response, Self::Error>>,
        BoxFuture<'static, Result<Self::Response, Self::Error>>,
    >;

    #[inline]
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let path = match resolve_path(&self.base_dir, req.uri().path()) {
            Some(path) => path,
            None => return Either::Left(ready(Ok(response::not_found()))),
        };

        // the file server never reads a request body
        let (parts, _) = req.into_parts();
        let req = Request::from_parts(parts, Empty::<Bytes>::new());

        Either::Right(self.file_server.serve(req, path))
    }
}
