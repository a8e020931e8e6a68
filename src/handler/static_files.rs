//! Static file serving module
//!
//! Resolve-and-serve for a single request: files, index files, directory
//! redirects and listings, conditional requests.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::body::{self, FileBody};
use crate::http::{self, cache, mime, response::Validators, ResolveError, ResponseBody};
use crate::logger;
use hyper::Response;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Serve whatever the request path resolves to under the root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let resolved = match http::resolve_request_path(&state.root, ctx.path) {
        Ok(r) => r,
        Err(e) => return resolve_error_response(ctx, &e),
    };

    let metadata = match fs::metadata(&resolved.canonical).await {
        Ok(m) => m,
        Err(e) => return io_error_response(ctx, &resolved.canonical, &e),
    };

    if metadata.is_dir() {
        serve_directory(ctx, state, &resolved.canonical).await
    } else if has_trailing_slash(ctx.path) {
        logger::log_debug(&format!("Not a directory: {}", ctx.path));
        http::build_404_response(ctx.is_head)
    } else {
        serve_file(ctx, &resolved.requested, &resolved.canonical).await
    }
}

/// A trailing slash names a directory, literally or percent-encoded
fn has_trailing_slash(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.ends_with(b"/") || (bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b"%2f"))
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        let parts = match http::path::normalize_components(ctx.path) {
            Ok(p) => p,
            Err(e) => return resolve_error_response(ctx, &e),
        };
        let mut location = http::directory_uri(&parts);
        if let Some(q) = ctx.query {
            location.push('?');
            location.push_str(q);
        }
        return http::build_301_response(&location);
    }

    for index_file in &state.config.serve.index_files {
        let candidate = dir.join(index_file);
        let Ok(canonical) = candidate.canonicalize() else {
            continue;
        };
        if !canonical.starts_with(&state.root) {
            logger::log_warning(&format!(
                "Index file escapes root, skipped: {} -> {}",
                candidate.display(),
                canonical.display()
            ));
            continue;
        }
        if canonical.is_file() {
            return serve_file(ctx, &candidate, &canonical).await;
        }
    }

    if !state.config.serve.directory_listing {
        return http::build_403_response(ctx.is_head);
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            http::build_html_response(listing::render_listing(ctx.path, &entries), ctx.is_head)
        }
        Err(e) => io_error_response(ctx, dir, &e),
    }
}

/// Serve a regular file. `requested` decides the content type, `canonical` is what gets read.
///
/// The body streams from the open handle, so validators and length come
/// from that same handle's metadata.
async fn serve_file(
    ctx: &RequestContext<'_>,
    requested: &Path,
    canonical: &Path,
) -> Response<ResponseBody> {
    let file = match fs::File::open(canonical).await {
        Ok(f) => f,
        Err(e) => return io_error_response(ctx, canonical, &e),
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => return io_error_response(ctx, canonical, &e),
    };

    let len = metadata.len();
    let modified = metadata.modified().ok();
    let validators = Validators {
        etag: cache::generate_etag(len, modified),
        last_modified: modified.map(cache::format_http_date),
    };

    if is_not_modified(ctx, &validators, modified) {
        return http::build_304_response(&validators);
    }

    let content_type = mime::get_content_type(requested.extension().and_then(|e| e.to_str()));
    let body = if ctx.is_head {
        body::empty()
    } else {
        FileBody::new(file, len).boxed()
    };
    http::response::build_file_response(body, len, content_type, &validators)
}

/// `If-None-Match` wins over `If-Modified-Since` when both are sent
fn is_not_modified(
    ctx: &RequestContext<'_>,
    validators: &Validators,
    modified: Option<SystemTime>,
) -> bool {
    if ctx.if_none_match.is_some() {
        return cache::check_etag_match(ctx.if_none_match.as_deref(), &validators.etag);
    }
    modified.is_some_and(|m| cache::is_not_modified_since(ctx.if_modified_since.as_deref(), m))
}

fn resolve_error_response(ctx: &RequestContext<'_>, error: &ResolveError) -> Response<ResponseBody> {
    match error {
        ResolveError::NotFound | ResolveError::BadEncoding | ResolveError::ForbiddenComponent => {
            logger::log_debug(&format!("Not found: {} ({error})", ctx.path));
            http::build_404_response(ctx.is_head)
        }
        ResolveError::OutsideRoot(_) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {} {error}", ctx.path));
            http::build_404_response(ctx.is_head)
        }
        ResolveError::PermissionDenied => {
            logger::log_warning(&format!("Permission denied resolving {}", ctx.path));
            http::build_403_response(ctx.is_head)
        }
        ResolveError::Io(e) => {
            logger::log_error(&format!("Failed to resolve '{}': {e}", ctx.path));
            http::build_500_response(ctx.is_head)
        }
    }
}

fn io_error_response(ctx: &RequestContext<'_>, path: &Path, error: &io::Error) -> Response<ResponseBody> {
    match error.kind() {
        io::ErrorKind::NotFound => http::build_404_response(ctx.is_head),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied reading '{}'", path.display()));
            http::build_403_response(ctx.is_head)
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {error}", path.display()));
            http::build_500_response(ctx.is_head)
        }
    }
}
