use http_handle::{Basic, DiskFileServer, Listener, Logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().init();

    let handler = Basic::new(Logging::new(DiskFileServer::new()), "demos");

    if let Err(err) = Listener::new().listen("127.0.0.1:3000", handler).await {
        eprintln!("server error: {err}");
    }
}
