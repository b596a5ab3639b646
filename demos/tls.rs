use http_handle::{DiskFileServer, IgnoreIndex, Logging, Prefix, TlsListener};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().init();

    // "/static/" is the only entry point, and index documents are only
    // reachable through their directory URL
    let file_server = Logging::new(DiskFileServer::new());
    let handler = IgnoreIndex::new(Prefix::new(file_server, "demos", "/static/"));

    let listener = TlsListener::new("cert.pem", "key.pem");

    if let Err(err) = listener.listen("127.0.0.1:3443", handler).await {
        eprintln!("server error: {err}");
    }
}
