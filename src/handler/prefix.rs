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

/// Handler serving files under a base directory mounted at a URL prefix.
///
/// The prefix is compared as an exact leading string, not a pattern. On a
/// match it is stripped and the remainder resolves exactly as
/// [`Basic`](super::Basic) would resolve it; requests without the prefix
/// are answered not-found, indistinguishable from a missing file. The
/// prefix alone (with its trailing slash) serves the base directory's
/// index.
///
/// # Example
/// ```
/// use http_handle::{DiskFileServer, Prefix};
///
/// // "/static/logo.png" serves "assets/logo.png"
/// let handler = Prefix::new(DiskFileServer::new(), "assets", "/static/");
/// # drop(handler);
/// ```
#[derive(Debug, Clone)]
pub struct Prefix<FS> {
    file_server: FS,
    base_dir: PathBuf,
    prefix: String,
}

impl<FS> Prefix<FS> {
    /// Create a handler serving `base_dir` under `prefix` with
    /// `file_server`.
    pub fn new<P, S>(file_server: FS, base_dir: P, prefix: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            file_server,
            base_dir: base_dir.into(),
            prefix: prefix.into(),
        }
    }
}

impl<ReqBody, FS> Service<Request<ReqBody>> for Prefix<FS>
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
        let remainder = match req.uri().path().strip_prefix(self.prefix.as_str()) {
            Some(remainder) => remainder,
            None => return Either::Left(ready(Ok(response::not_found()))),
        };

        let path = match resolve_path(&self.base_dir, remainder) {
            Some(path) => path,
            None => return Either::Left(ready(Ok(response::not_found()))),
        };

        let (parts, _) = req.into_parts();
        let req = Request::from_parts(parts, Empty::<Bytes>::new());

        Either::Right(self.file_server.serve(req, path))
    }
}
