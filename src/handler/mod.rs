//! Request handlers and handler decorators.
//!
//! A handler is a [`tower_service::Service`] taking an [`http::Request`]
//! and producing an [`http::Response`]. Decorators accept a handler (or
//! the underlying [`FileServer`](crate::FileServer)) and return a new
//! value of the same shape, composed by explicit nesting at wiring time:
//!
//! ```
//! use http_handle::{Basic, DiskFileServer, IgnoreIndex};
//!
//! let handler = IgnoreIndex::new(Basic::new(DiskFileServer::new(), "assets"));
//! # drop(handler);
//! ```

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode;

pub use basic::Basic;
pub use ignore_index::IgnoreIndex;
pub use prefix::Prefix;

mod basic;
mod ignore_index;
mod prefix;

/// Resolve a request path against the base directory.
///
/// The path is percent-decoded and joined component by component; anything
/// that could escape the base directory resolves to `None` and surfaces as
/// not-found:
///
/// - segments containing `..`
/// - absolute segments or drive prefixes
/// - segments containing a backslash
fn resolve_path(base: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode(request_path.trim_start_matches('/').as_bytes())
        .decode_utf8()
        .ok()?;

    let mut resolved = base.to_path_buf();
    for component in Path::new(&*decoded).components() {
        match component {
            Component::Normal(segment) => {
                if segment.to_str().map_or(true, |s| s.contains('\\')) {
                    return None;
                }

                // a single URL segment must stay a single path segment once
                // re-parsed (rejects `c:` style prefixes on Windows)
                if Path::new(&segment)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    resolved.push(segment);
                } else {
                    return None;
                }
            }
            Component::CurDir => {}
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return None;
            }
        }
    }

    Some(resolved)
}
