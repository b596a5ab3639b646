use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use http_body::{Body, Empty, Full};

use crate::ResponseBody;

pub(crate) const NOT_FOUND_BODY: &str = "404 page not found\n";

pub(crate) fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|err| match err {})
        .boxed_unsync()
}

pub(crate) fn full_body(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::from(bytes.into())
        .map_err(|err| match err {})
        .boxed_unsync()
}

pub(crate) fn with_status(status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .body(empty_body())
        .unwrap()
}

/// The uniform not-found response. Missing files, failed prefix matches and
/// suppressed index documents all produce this exact response, so a caller
/// cannot tell them apart.
pub(crate) fn not_found() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .header(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        )
        .body(full_body(NOT_FOUND_BODY))
        .unwrap()
}

/// A permanent redirect with an empty body. `location` is relative so the
/// redirect stays correct under any mount prefix.
pub(crate) fn moved_permanently(location: HeaderValue) -> Response<ResponseBody> {
    let mut response = with_status(StatusCode::MOVED_PERMANENTLY);
    response.headers_mut().insert(header::LOCATION, location);

    response
}
