use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use http::HeaderMap;
use http_body::Body;
use pin_project::pin_project;
use tokio::io::{AsyncRead, AsyncReadExt, Take};
use tokio_util::io::ReaderStream;

/// Adapter that turns an `impl AsyncRead` into an `impl Body`, streaming
/// file contents chunk by chunk instead of loading them into memory.
#[pin_project]
#[derive(Debug)]
pub struct FileBody<T> {
    #[pin]
    stream: ReaderStream<T>,
}

impl<T> FileBody<T>
where
    T: AsyncRead,
{
    /// Stream the whole reader with the given read buffer capacity.
    pub(crate) fn with_capacity(reader: T, capacity: usize) -> Self {
        Self {
            stream: ReaderStream::with_capacity(reader, capacity),
        }
    }

    /// Stream at most `limit` bytes from the reader, for range responses.
    pub(crate) fn with_capacity_limited(
        reader: T,
        capacity: usize,
        limit: u64,
    ) -> FileBody<Take<T>> {
        FileBody {
            stream: ReaderStream::with_capacity(reader.take(limit), capacity),
        }
    }
}

impl<T> Body for FileBody<T>
where
    T: AsyncRead,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        self.project().stream.poll_next(cx)
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Option<HeaderMap>, Self::Error>> {
        Poll::Ready(Ok(None))
    }
}
