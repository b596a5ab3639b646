use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use hyper::server::conn::Http;
use rustls_pemfile::Item;
use tokio::net::TcpListener;
use tokio_rustls::rustls::{Certificate, PrivateKey, ServerConfig};
use tokio_rustls::TlsAcceptor;
use tower::BoxError;
use tracing::debug;

use super::{BoxHandler, TlsBind, TlsListener};

/// TLS bind backed by rustls over tokio, driving every accepted
/// connection with hyper's HTTP/1 connection driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustlsBind;

impl TlsBind for RustlsBind {
    fn listen_and_serve_tls(
        &self,
        binding: String,
        cert: PathBuf,
        key: PathBuf,
        handler: BoxHandler,
    ) -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin(async move {
            let config = tls_config(&cert, &key)?;
            let acceptor = TlsAcceptor::from(Arc::new(config));
            let listener = TcpListener::bind(binding.as_str()).await?;

            loop {
                let (stream, peer) = listener.accept().await?;
                let acceptor = acceptor.clone();
                let handler = handler.clone();

                // a failing connection must not bring the accept loop down
                tokio::spawn(async move {
                    let stream = match acceptor.accept(stream).await {
                        Ok(stream) => stream,
                        Err(err) => {
                            debug!(peer = %peer, error = %err, "tls handshake failed");

                            return;
                        }
                    };

                    if let Err(err) = Http::new().serve_connection(stream, handler).await {
                        debug!(peer = %peer, error = %err, "connection error");
                    }
                });
            }
        })
    }
}

impl TlsListener<RustlsBind> {
    /// Listener serving TLS with the given PEM certificate chain and
    /// private key.
    ///
    /// The files are read on every [`listen`](TlsListener::listen) call;
    /// unreadable or invalid material surfaces as the listen error.
    pub fn new<C, K>(cert: C, key: K) -> Self
    where
        C: Into<PathBuf>,
        K: Into<PathBuf>,
    {
        Self::with_bind(cert, key, RustlsBind)
    }
}

fn tls_config(cert: &Path, key: &Path) -> Result<ServerConfig, BoxError> {
    let mut reader = BufReader::new(File::open(cert)?);
    let certs: Vec<Certificate> = rustls_pemfile::certs(&mut reader)?
        .into_iter()
        .map(Certificate)
        .collect();

    if certs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no certificate found in {}", cert.display()),
        )
        .into());
    }

    let key = load_private_key(key)?;

    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(config)
}

fn load_private_key(path: &Path) -> Result<PrivateKey, BoxError> {
    let mut reader = BufReader::new(File::open(path)?);

    while let Some(item) = rustls_pemfile::read_one(&mut reader)? {
        match item {
            Item::RSAKey(key) | Item::PKCS8Key(key) | Item::ECKey(key) => {
                return Ok(PrivateKey(key));
            }
            _ => {}
        }
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("no private key found in {}", path.display()),
    )
    .into())
}
