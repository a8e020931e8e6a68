mod common;

use std::time::Duration;

use common::{request, start_server, RawResponse, TestDir};
use coi_serve::server;

fn assert_isolated(resp: &RawResponse) {
    assert_eq!(resp.header("Cross-Origin-Embedder-Policy"), Some("require-corp"));
    assert_eq!(resp.header("Cross-Origin-Opener-Policy"), Some("same-origin"));
}

#[tokio::test]
async fn serves_entry_file_byte_identical() {
    let root = TestDir::new("entry");
    let contents = b"<!doctype html><script>new SharedArrayBuffer(8)</script>\n";
    root.write("live-test.html", contents);
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "/live-test.html").await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, contents);
    assert_eq!(resp.header("Content-Type"), Some("text/html; charset=utf-8"));
    assert_isolated(&resp);
}

#[tokio::test]
async fn missing_file_is_404_with_headers() {
    let root = TestDir::new("missing");
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "/missing.html").await;
    assert_eq!(resp.status, 404);
    assert_isolated(&resp);
}

#[tokio::test]
async fn directory_without_index_is_listed() {
    let root = TestDir::new("listing");
    root.write("assets/engine.js", b"export {}");
    root.write("assets/shader.wgsl", b"// wgsl");
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "/assets/").await;
    assert_eq!(resp.status, 200);
    assert_isolated(&resp);
    let html = resp.body_text();
    assert!(html.contains("engine.js"));
    assert!(html.contains("shader.wgsl"));

    let redirect = request(srv.addr, "GET", "/assets").await;
    assert_eq!(redirect.status, 301);
    assert_eq!(redirect.header("Location"), Some("/assets/"));
    assert_isolated(&redirect);
}

#[tokio::test]
async fn redirect_never_leaves_origin() {
    let root = TestDir::new("redirect-origin");
    root.write("assets/app.js", b"1");
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "//evil.example/%2e%2e").await;
    assert_eq!(resp.status, 301);
    assert_eq!(resp.header("Location"), Some("/"));
    assert_isolated(&resp);

    for target in ["//evil.example/%2e%2e", "//assets", "/%2F%2Fevil.example/..", "/.//assets"] {
        let resp = request(srv.addr, "GET", target).await;
        assert_eq!(resp.status, 301, "{target}");
        let location = resp.header("Location").unwrap_or_default();
        assert!(location.starts_with('/'), "{target} -> {location}");
        assert!(!location.starts_with("//"), "{target} -> {location}");
    }
}

#[tokio::test]
async fn file_with_trailing_slash_is_404() {
    let root = TestDir::new("file-slash");
    root.write("live-test.html", b"<h1>live</h1>");
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "/live-test.html/").await;
    assert_eq!(resp.status, 404);
    assert_isolated(&resp);
}

#[tokio::test]
async fn large_file_streams_byte_identical() {
    let root = TestDir::new("large");
    let contents: Vec<u8> = (0..1_000_000u32).map(|i| (i % 241) as u8).collect();
    root.write("assets/model.bin", &contents);
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "GET", "/assets/model.bin").await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("Content-Length"), Some("1000000"));
    assert_eq!(resp.body.len(), contents.len());
    assert!(resp.body == contents);
    assert_isolated(&resp);
}

#[tokio::test]
async fn every_response_is_isolated() {
    let root = TestDir::new("every");
    root.write("index.html", b"home");
    let srv = start_server(root.path()).await;

    for (method, target, status) in [
        ("GET", "/", 200),
        ("HEAD", "/index.html", 200),
        ("GET", "/nope", 404),
        ("OPTIONS", "/", 204),
        ("POST", "/index.html", 405),
        ("PUT", "/index.html", 405),
    ] {
        let resp = request(srv.addr, method, target).await;
        assert_eq!(resp.status, status, "{method} {target}");
        assert_isolated(&resp);
    }
}

#[tokio::test]
async fn head_returns_headers_only() {
    let root = TestDir::new("head");
    root.write("data.json", b"{\"a\":1}");
    let srv = start_server(root.path()).await;

    let resp = request(srv.addr, "HEAD", "/data.json").await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("Content-Length"), Some("7"));
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn traversal_cannot_escape_root() {
    let parent = TestDir::new("traversal");
    parent.write("secret.txt", b"top secret");
    parent.write("public/index.html", b"public");
    let srv = start_server(&parent.path().join("public")).await;

    for target in [
        "/../secret.txt",
        "/../../secret.txt",
        "/%2e%2e/secret.txt",
        "/..%2fsecret.txt",
        "/../../etc/passwd",
    ] {
        let resp = request(srv.addr, "GET", target).await;
        assert_eq!(resp.status, 404, "{target}");
        assert!(!resp.body_text().contains("top secret"), "{target}");
        assert!(!resp.body_text().contains("root:"), "{target}");
        assert_isolated(&resp);
    }
}

#[tokio::test]
async fn second_instance_cannot_bind_same_port() {
    let root = TestDir::new("bind");
    let srv = start_server(root.path()).await;

    let err = server::create_listener(srv.addr).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
}

#[tokio::test]
async fn shutdown_stops_accept_loop() {
    let root = TestDir::new("shutdown");
    let srv = start_server(root.path()).await;

    srv.shutdown.notify_one();
    tokio::time::timeout(Duration::from_secs(5), srv.handle)
        .await
        .expect("server loop did not stop")
        .unwrap();
}
