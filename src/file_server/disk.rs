use std::io::{self, SeekFrom};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request, Response, StatusCode, Uri};
use http_body::{Body, Empty};
use http_range_header::RangeUnsatisfiableError;
use httpdate::HttpDate;
use mime_guess::mime;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

use super::FileServer;
use crate::body::FileBody;
use crate::{response, ResponseBody, INDEX_FILE};

// default read buffer 64KiB
const DEFAULT_CHUNK_SIZE: usize = 65536;

/// [`FileServer`] backed by the local filesystem.
///
/// Implements the canonicalizing behavior of a conventional static file
/// server:
///
/// - a regular file is served with `200` and a content type guessed from
///   its extension
/// - a directory requested with a trailing slash serves its `index.html`
/// - a directory requested without a trailing slash redirects (`301`) to
///   the slash form
/// - the index document addressed by its own name redirects (`301`) to the
///   containing directory, so each directory has one canonical URL
/// - anything absent or unreadable is `404` with the body
///   `404 page not found\n`
///
/// `Last-Modified`, conditional requests (`If-Modified-Since`,
/// `If-Unmodified-Since`) and single-range `Range` requests are honored.
/// Redirect locations are relative, so the same file server works behind
/// any mount prefix.
#[derive(Debug, Clone, Copy)]
pub struct DiskFileServer {
    chunk_size: usize,
}

impl DiskFileServer {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set a specific read buffer chunk size.
    ///
    /// The default capacity is 64kb.
    pub fn with_buf_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for DiskFileServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FileServer for DiskFileServer {
    fn serve(
        &self,
        req: Request<Empty<Bytes>>,
        path: PathBuf,
    ) -> BoxFuture<'static, io::Result<Response<ResponseBody>>> {
        let chunk_size = self.chunk_size;

        Box::pin(async move { serve_path(req, path, chunk_size).await })
    }
}

async fn serve_path(
    req: Request<Empty<Bytes>>,
    mut path: PathBuf,
    chunk_size: usize,
) -> io::Result<Response<ResponseBody>> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        let mut response = response::with_status(StatusCode::METHOD_NOT_ALLOWED);
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET,HEAD"));

        return Ok(response);
    }

    let uri_path = req.uri().path();

    // The index document addressed by name redirects to its directory, so
    // the directory form stays the only canonical URL.
    if uri_path.rsplit('/').next() == Some(INDEX_FILE) {
        return Ok(response::moved_permanently(HeaderValue::from_static("./")));
    }

    let trailing_slash = uri_path.ends_with('/');

    let meta = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(err) => return error_response(err),
    };

    let meta = if meta.is_dir() {
        if !trailing_slash {
            return Ok(response::moved_permanently(directory_location(req.uri())));
        }

        path.push(INDEX_FILE);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if !meta.is_dir() => meta,
            Ok(_) => return Ok(response::not_found()),
            Err(err) => return error_response(err),
        }
    } else if trailing_slash {
        // A regular file has no directory form.
        return Ok(response::not_found());
    } else {
        meta
    };

    let modified = meta.modified().ok().map(HttpDate::from);

    if let Some(status) = check_conditional_headers(req.headers(), modified) {
        return Ok(response::with_status(status));
    }

    let mime = mime_guess::from_path(&path)
        .first_raw()
        .map(HeaderValue::from_static)
        .unwrap_or_else(|| {
            HeaderValue::from_str(mime::APPLICATION_OCTET_STREAM.as_ref()).unwrap()
        });

    let len = meta.len();
    let range_header = req
        .headers()
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let maybe_range = try_parse_range(range_header, len);

    let file = if req.method() == Method::GET {
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) => return error_response(err),
        };

        if let Some(Ok(ranges)) = &maybe_range {
            if let [range] = ranges.as_slice() {
                file.seek(SeekFrom::Start(*range.start())).await?;
            }
        }

        Some(file)
    } else {
        None
    };

    Ok(build_response(
        file,
        len,
        mime,
        modified,
        maybe_range,
        chunk_size,
    ))
}

fn build_response(
    file: Option<File>,
    len: u64,
    mime: HeaderValue,
    modified: Option<HttpDate>,
    maybe_range: Option<Result<Vec<RangeInclusive<u64>>, RangeUnsatisfiableError>>,
    chunk_size: usize,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, mime)
        .header(header::ACCEPT_RANGES, "bytes");

    if let Some(modified) = modified {
        builder = builder.header(header::LAST_MODIFIED, modified.to_string());
    }

    match maybe_range {
        Some(Ok(ranges)) => {
            if let [range] = ranges.as_slice() {
                let body = match file {
                    Some(file) => {
                        let range_len = range.end() - range.start() + 1;

                        FileBody::with_capacity_limited(file, chunk_size, range_len)
                            .boxed_unsync()
                    }
                    None => response::empty_body(),
                };

                builder
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", range.start(), range.end(), len),
                    )
                    .header(header::CONTENT_LENGTH, range.end() - range.start() + 1)
                    .status(StatusCode::PARTIAL_CONTENT)
                    .body(body)
                    .unwrap()
            } else {
                // multipart ranges are not supported
                builder
                    .header(header::CONTENT_RANGE, format!("bytes */{len}"))
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .body(response::full_body("Cannot serve multipart range requests"))
                    .unwrap()
            }
        }

        Some(Err(_)) => builder
            .header(header::CONTENT_RANGE, format!("bytes */{len}"))
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .body(response::empty_body())
            .unwrap(),

        // Not a range request
        None => {
            let body = match file {
                Some(file) => FileBody::with_capacity(file, chunk_size).boxed_unsync(),
                None => response::empty_body(),
            };

            builder
                .header(header::CONTENT_LENGTH, len.to_string())
                .body(body)
                .unwrap()
        }
    }
}

fn check_conditional_headers(
    headers: &HeaderMap,
    modified: Option<HttpDate>,
) -> Option<StatusCode> {
    if let Some(since) = parse_date_header(headers, header::IF_UNMODIFIED_SINCE) {
        let precondition = modified
            .map(|modified| modified <= since)
            .unwrap_or(false);

        if !precondition {
            return Some(StatusCode::PRECONDITION_FAILED);
        }
    }

    if let Some(since) = parse_date_header(headers, header::IF_MODIFIED_SINCE) {
        // no modification time means the file counts as always modified
        let unmodified = modified
            .map(|modified| modified <= since)
            .unwrap_or(false);

        if unmodified {
            return Some(StatusCode::NOT_MODIFIED);
        }
    }

    None
}

fn parse_date_header(headers: &HeaderMap, name: HeaderName) -> Option<HttpDate> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

fn try_parse_range(
    maybe_range_ref: Option<&str>,
    file_size: u64,
) -> Option<Result<Vec<RangeInclusive<u64>>, RangeUnsatisfiableError>> {
    maybe_range_ref.map(|header_value| {
        http_range_header::parse_range_header(header_value)
            .and_then(|first_pass| first_pass.validate(file_size))
    })
}

// Redirect target for a directory requested without its trailing slash:
// the last URL segment with the slash appended, keeping the query.
fn directory_location(uri: &Uri) -> HeaderValue {
    let base = uri.path().rsplit('/').next().unwrap_or_default();

    let location = match uri.query() {
        Some(query) => format!("{base}/?{query}"),
        None => format!("{base}/"),
    };

    HeaderValue::from_str(&location).unwrap_or_else(|_| HeaderValue::from_static("./"))
}

fn error_response(err: io::Error) -> io::Result<Response<ResponseBody>> {
    if let io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied = err.kind() {
        Ok(response::not_found())
    } else {
        Err(err)
    }
}
