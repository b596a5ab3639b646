use std::future::{ready, Ready};
use std::io;
use std::task::{Context, Poll};

use futures_util::future::Either;
use http::{Request, Response};
use tower_service::Service;

use crate::{response, ResponseBody, INDEX_FILE};

/// Decorator suppressing direct access to index documents.
///
/// Requests whose final path segment is the index document's literal
/// filename are answered not-found without reaching the wrapped handler.
/// Requesting the directory itself still serves the index, so every
/// directory keeps a single canonical URL.
///
/// # Example
/// ```
/// use http_handle::{Basic, DiskFileServer, IgnoreIndex};
///
/// // "/" serves the index, "/index.html" is a 404
/// let handler = IgnoreIndex::new(Basic::new(DiskFileServer::new(), "assets"));
/// # drop(handler);
/// ```
#[derive(Debug, Clone)]
pub struct IgnoreIndex<S> {
    inner: S,
}

impl<S> IgnoreIndex<S> {
    /// Wrap `inner`, hiding the index document's filename.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<ReqBody, S> Service<Request<ReqBody>> for IgnoreIndex<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResponseBody>, Error = io::Error>,
{
    type Response = Response<ResponseBody>;
    type Error = io::Error;
    type Future = Either<Ready<Result<Self::Response, Self::Error>>, S::Future>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if req.uri().path().rsplit('/').next() == Some(INDEX_FILE) {
            return Either::Left(ready(Ok(response::not_found())));
        }

        Either::Right(self.inner.call(req))
    }
}
