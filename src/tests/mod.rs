use std::fs;
use std::io;

use http::{Request, Response, StatusCode};
use hyper::Body;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_service::Service;

use crate::{Basic, DiskFileServer, IgnoreIndex, Logging, Prefix, ResponseBody};

const INDEX: &str = "Space: the final frontier";
const FILE: &str = "These are the voyages of the starship Enterprise.";
const SUB_INDEX: &str = "Its continuing mission:";
const SUB_FILE: &str = "To explore strange new worlds";
const SUB_DEEP_INDEX: &str = "To seek out new life and new civilizations";
const SUB_DEEP_FILE: &str = "To boldly go where no one has gone before";
const NOT_FOUND: &str = "404 page not found\n";

fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();

    let files = [
        ("index.html", INDEX),
        ("file.txt", FILE),
        ("sub/index.html", SUB_INDEX),
        ("sub/file.txt", SUB_FILE),
        ("sub/deep/index.html", SUB_DEEP_INDEX),
        ("sub/deep/file.txt", SUB_DEEP_FILE),
    ];
    for (name, contents) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    dir
}

fn base_cases() -> Vec<(&'static str, StatusCode, &'static str)> {
    vec![
        ("/", StatusCode::OK, INDEX),
        ("/index.html", StatusCode::MOVED_PERMANENTLY, ""),
        ("/file.txt", StatusCode::OK, FILE),
        ("/bad.txt", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/sub/", StatusCode::OK, SUB_INDEX),
        ("/sub/index.html", StatusCode::MOVED_PERMANENTLY, ""),
        ("/sub/file.txt", StatusCode::OK, SUB_FILE),
        ("/sub/bad.txt", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/sub/deep/", StatusCode::OK, SUB_DEEP_INDEX),
        ("/sub/deep/file.txt", StatusCode::OK, SUB_DEEP_FILE),
    ]
}

async fn send<H>(handler: H, path: &str) -> Response<ResponseBody>
where
    H: Service<Request<Body>, Response = Response<ResponseBody>, Error = io::Error>,
{
    let req = Request::builder()
        .uri(format!("http://localhost{path}"))
        .body(Body::empty())
        .unwrap();

    handler.oneshot(req).await.unwrap()
}

async fn body_text(body: ResponseBody) -> String {
    let bytes = hyper::body::to_bytes(body).await.unwrap();

    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn check<H>(handler: H, path: &str, status: StatusCode, contents: &str)
where
    H: Service<Request<Body>, Response = Response<ResponseBody>, Error = io::Error>,
{
    let response = send(handler, path).await;

    assert_eq!(response.status(), status, "status for {path}");
    assert_eq!(
        body_text(response.into_body()).await,
        contents,
        "body for {path}"
    );
}

#[tokio::test]
async fn basic_with_and_without_logging() {
    let dir = fixture_dir();
    let plain = Basic::new(DiskFileServer::new(), dir.path());
    let logged = Basic::new(Logging::new(DiskFileServer::new()), dir.path());

    for (path, status, contents) in base_cases() {
        check(plain.clone(), path, status, contents).await;
        check(logged.clone(), path, status, contents).await;
    }
}

#[tokio::test]
async fn prefix_translates_paths() {
    let dir = fixture_dir();
    let prefix = "/my/prefix/path/";
    let plain = Prefix::new(DiskFileServer::new(), dir.path(), prefix);
    let logged = Prefix::new(Logging::new(DiskFileServer::new()), dir.path(), prefix);

    for (path, status, contents) in base_cases() {
        let mounted = format!("{}{path}", prefix.trim_end_matches('/'));
        check(plain.clone(), &mounted, status, contents).await;
        check(logged.clone(), &mounted, status, contents).await;
    }
}

#[tokio::test]
async fn prefix_mismatch_is_not_found() {
    let dir = fixture_dir();
    let handler = Prefix::new(DiskFileServer::new(), dir.path(), "/my/prefix/path/");

    // unknown prefix, and the prefix without its trailing slash
    check(handler.clone(), "/file.txt", StatusCode::NOT_FOUND, NOT_FOUND).await;
    check(handler, "/my/prefix/path", StatusCode::NOT_FOUND, NOT_FOUND).await;
}

#[tokio::test]
async fn ignore_index_hides_the_index_filename() {
    let dir = fixture_dir();
    let handler = IgnoreIndex::new(Basic::new(DiskFileServer::new(), dir.path()));

    let cases = [
        ("/", StatusCode::OK, INDEX),
        ("/index.html", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/file.txt", StatusCode::OK, FILE),
        ("/bad.txt", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/sub/", StatusCode::OK, SUB_INDEX),
        ("/sub/index.html", StatusCode::NOT_FOUND, NOT_FOUND),
        ("/sub/file.txt", StatusCode::OK, SUB_FILE),
    ];

    for (path, status, contents) in cases {
        check(handler.clone(), path, status, contents).await;
    }
}

#[tokio::test]
async fn ignore_index_composes_over_prefix() {
    let dir = fixture_dir();
    let handler = IgnoreIndex::new(Prefix::new(
        DiskFileServer::new(),
        dir.path(),
        "/my/prefix/path/",
    ));

    check(handler.clone(), "/my/prefix/path/", StatusCode::OK, INDEX).await;
    check(
        handler.clone(),
        "/my/prefix/path/index.html",
        StatusCode::NOT_FOUND,
        NOT_FOUND,
    )
    .await;
    check(
        handler,
        "/my/prefix/path/file.txt",
        StatusCode::OK,
        FILE,
    )
    .await;
}

#[tokio::test]
async fn logging_is_response_transparent() {
    let dir = fixture_dir();

    for path in ["/", "/index.html", "/file.txt", "/bad.txt", "/sub/"] {
        let plain = send(Basic::new(DiskFileServer::new(), dir.path()), path).await;
        let logged = send(
            Basic::new(Logging::new(DiskFileServer::new()), dir.path()),
            path,
        )
        .await;

        assert_eq!(plain.status(), logged.status(), "status for {path}");
        assert_eq!(plain.headers(), logged.headers(), "headers for {path}");
        assert_eq!(
            body_text(plain.into_body()).await,
            body_text(logged.into_body()).await,
            "body for {path}"
        );
    }
}

#[tokio::test]
async fn traversal_stays_inside_the_base_directory() {
    let dir = fixture_dir();
    fs::write(dir.path().join("secret.txt"), "secret").unwrap();

    // serve only the sub directory; its parent holds the secret
    let handler = Basic::new(DiskFileServer::new(), dir.path().join("sub"));

    for path in [
        "/../secret.txt",
        "/%2e%2e/secret.txt",
        "/..%2fsecret.txt",
        "/deep/..%2f..%2fsecret.txt",
    ] {
        check(handler.clone(), path, StatusCode::NOT_FOUND, NOT_FOUND).await;
    }
}
