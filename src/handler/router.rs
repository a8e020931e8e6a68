//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, dispatch to static serving, response header stamping and
//! access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Every response leaving here carries the cross-origin isolation headers,
/// whatever its status.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    // Only the head is needed; GET/HEAD bodies are ignored
    let (parts, _) = req.into_parts();

    let mut response = if let Some(resp) = check_http_method(&parts.method) {
        resp
    } else {
        let ctx = RequestContext {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header_string(&parts.headers, "if-none-match"),
            if_modified_since: header_string(&parts.headers, "if-modified-since"),
        };
        static_files::serve(&ctx, &state).await
    };

    http::apply_response_headers(&mut response, &state.config.http.server_name);

    if state.access_log_enabled() {
        let entry = access_log_entry(&parts, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_debug(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_log_entry(
    req: &Parts,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_default();
    entry.referer = header_string(&req.headers, "referer");
    entry.user_agent = header_string(&req.headers, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_09 {
        "0.9"
    } else {
        "1.1"
    }
}
