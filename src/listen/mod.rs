//! Listener wiring: binding a network address and serving a handler on it.
//!
//! The actual bind-and-serve step sits behind the [`Bind`] and [`TlsBind`]
//! capabilities so tests can intercept it without any network I/O.
//! Production code fixes them once at wiring time ([`TcpBind`] for plain
//! HTTP, `RustlsBind` for TLS) and never reassigns them afterwards.

use std::io;
use std::path::PathBuf;

use futures_util::future::BoxFuture;
use http::{Request, Response};
use hyper::server::conn::AddrIncoming;
use hyper::{Body, Server};
use tokio::net::TcpListener;
use tower::make::Shared;
use tower::util::BoxCloneService;
use tower::BoxError;
use tower_service::Service;

use crate::ResponseBody;

#[cfg(feature = "tls")]
mod tls;

#[cfg(feature = "tls")]
pub use tls::RustlsBind;

/// Boxed handler handed to the bind capabilities, so implementations work
/// with a single concrete service type.
pub type BoxHandler = BoxCloneService<Request<Body>, Response<ResponseBody>, io::Error>;

/// Capability for binding a network address and serving a handler on it.
///
/// The returned future resolves only when the server stops: with the bind
/// error, or with an error out of the accept loop.
pub trait Bind {
    fn listen_and_serve(
        &self,
        binding: String,
        handler: BoxHandler,
    ) -> BoxFuture<'static, Result<(), BoxError>>;
}

/// Capability for binding a network address and serving a handler over
/// TLS, with PEM certificate and key material read from the given paths.
pub trait TlsBind {
    fn listen_and_serve_tls(
        &self,
        binding: String,
        cert: PathBuf,
        key: PathBuf,
        handler: BoxHandler,
    ) -> BoxFuture<'static, Result<(), BoxError>>;
}

/// Plain TCP bind backed by hyper's HTTP/1 server.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpBind;

impl Bind for TcpBind {
    fn listen_and_serve(
        &self,
        binding: String,
        handler: BoxHandler,
    ) -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin(async move {
            let listener = TcpListener::bind(binding.as_str()).await?;
            let incoming = AddrIncoming::from_listener(listener)?;

            Server::builder(incoming).serve(Shared::new(handler)).await?;

            Ok(())
        })
    }
}

/// Listener for plain HTTP.
///
/// Owns its [`Bind`] capability; [`Listener::new`] picks the real network
/// bind, [`Listener::with_bind`] substitutes another one for tests.
#[derive(Debug, Clone)]
pub struct Listener<B = TcpBind> {
    bind: B,
}

impl Listener<TcpBind> {
    /// Listener using the real TCP bind.
    pub fn new() -> Self {
        Self::with_bind(TcpBind)
    }
}

impl Default for Listener<TcpBind> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Listener<B>
where
    B: Bind,
{
    /// Listener with an explicit bind capability.
    pub fn with_bind(bind: B) -> Self {
        Self { bind }
    }

    /// Serve `handler` on `binding`, blocking the task until the server
    /// stops.
    ///
    /// Whatever error the bind capability produces is returned as-is; the
    /// caller decides whether to retry or exit.
    pub async fn listen<H>(&self, binding: &str, handler: H) -> Result<(), BoxError>
    where
        H: Service<Request<Body>, Response = Response<ResponseBody>, Error = io::Error>
            + Clone
            + Send
            + 'static,
        H::Future: Send + 'static,
    {
        self.bind
            .listen_and_serve(binding.to_owned(), BoxCloneService::new(handler))
            .await
    }
}

/// Listener for HTTPS.
///
/// Certificate and key paths are captured at construction and handed to
/// the [`TlsBind`] capability unchanged on every [`TlsListener::listen`]
/// call.
#[derive(Debug, Clone)]
pub struct TlsListener<B> {
    cert: PathBuf,
    key: PathBuf,
    bind: B,
}

impl<B> TlsListener<B>
where
    B: TlsBind,
{
    /// Listener with an explicit TLS bind capability.
    pub fn with_bind<C, K>(cert: C, key: K, bind: B) -> Self
    where
        C: Into<PathBuf>,
        K: Into<PathBuf>,
    {
        Self {
            cert: cert.into(),
            key: key.into(),
            bind,
        }
    }

    /// Serve `handler` over TLS on `binding`, blocking the task until the
    /// server stops.
    ///
    /// Bind and certificate-load errors are returned as-is, unretried.
    pub async fn listen<H>(&self, binding: &str, handler: H) -> Result<(), BoxError>
    where
        H: Service<Request<Body>, Response = Response<ResponseBody>, Error = io::Error>
            + Clone
            + Send
            + 'static,
        H::Future: Send + 'static,
    {
        self.bind
            .listen_and_serve_tls(
                binding.to_owned(),
                self.cert.clone(),
                self.key.clone(),
                BoxCloneService::new(handler),
            )
            .await
    }
}
