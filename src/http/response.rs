//! HTTP response building module
//!
//! Provides builders for the status codes the file server emits. Header
//! stamping (isolation policy, `Server`) happens afterwards in the router.

use super::body::{empty, full, ResponseBody};
use hyper::Response;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Validators attached to a file response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<String>,
}

/// Build 200 OK response for file content
///
/// `content_length` is the file size even when `body` is empty for HEAD.
pub fn build_file_response(
    body: ResponseBody,
    content_length: u64,
    content_type: &str,
    validators: &Validators,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", &validators.etag);
    if let Some(last_modified) = &validators.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty())
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(304)
        .header("ETag", &validators.etag);
    if let Some(last_modified) = &validators.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(empty())
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head { empty() } else { full(content) };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty())
        })
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_301_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty())
        })
}

/// Build 403 Forbidden response
pub fn build_403_response(is_head: bool) -> Response<ResponseBody> {
    build_error_response(403, "403 Forbidden", is_head)
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<ResponseBody> {
    build_error_response(404, "404 Not Found", is_head)
}

/// Build 500 Internal Server Error response
pub fn build_500_response(is_head: bool) -> Response<ResponseBody> {
    build_error_response(500, "500 Internal Server Error", is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", ALLOWED_METHODS)
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full("405 Method Not Allowed"))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty())
        })
}

fn build_error_response(status: u16, message: &'static str, is_head: bool) -> Response<ResponseBody> {
    let body = if is_head { empty() } else { full(message) };

    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", message.len())
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(message, &e);
            Response::new(full(message))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
