//! Request path resolution
//!
//! Maps the path component of a request URI onto a file under the root
//! directory. Resolution is lexical first (percent-decoding, dropping `.`
//! and clamping `..` at the root), then the result is canonicalised and
//! must still lie under the canonical root, which catches symlinks that
//! point elsewhere.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Why a request path could not be mapped to a file under the root
#[derive(Debug)]
pub enum ResolveError {
    /// Percent-decoding produced invalid UTF-8
    BadEncoding,
    /// A path component contains a NUL byte or a backslash
    ForbiddenComponent,
    /// Nothing exists at the resolved location
    NotFound,
    /// The location exists but may not be inspected
    PermissionDenied,
    /// The canonical target lies outside the root
    OutsideRoot(PathBuf),
    Io(io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadEncoding => write!(f, "path is not valid percent-encoded UTF-8"),
            Self::ForbiddenComponent => write!(f, "path contains a forbidden component"),
            Self::NotFound => write!(f, "no such file or directory"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::OutsideRoot(target) => write!(f, "resolves outside root: {}", target.display()),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<io::Error> for ResolveError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(e),
        }
    }
}

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Root joined with the normalised request components
    pub requested: PathBuf,
    /// Canonical location, guaranteed to be under the root
    pub canonical: PathBuf,
}

/// Split a raw URI path into normalised, decoded components
pub fn normalize_components(request_path: &str) -> Result<Vec<String>, ResolveError> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadEncoding)?;

    let mut parts: Vec<String> = Vec::new();
    for part in decoded.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p if p.contains('\0') || p.contains('\\') => {
                return Err(ResolveError::ForbiddenComponent);
            }
            p => parts.push(p.to_string()),
        }
    }
    Ok(parts)
}

/// Characters escaped inside one URI path segment
const SEGMENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Rebuild an absolute URI path for a directory from normalised components
///
/// Each component is percent-encoded on its own and the result always ends
/// in `/`. Components are never empty, so the path starts with exactly one
/// slash and cannot be read as a network-path reference.
pub fn directory_uri(parts: &[String]) -> String {
    let mut uri = String::from("/");
    for part in parts {
        uri.extend(utf8_percent_encode(part, SEGMENT_ESCAPE));
        uri.push('/');
    }
    uri
}

/// Resolve a request path against a canonical root directory
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<ResolvedPath, ResolveError> {
    let requested = normalize_components(request_path)?
        .iter()
        .fold(root.to_path_buf(), |acc, part| acc.join(part));

    let canonical = requested.canonicalize()?;
    if !canonical.starts_with(root) {
        return Err(ResolveError::OutsideRoot(canonical));
    }

    Ok(ResolvedPath {
        requested,
        canonical,
    })
}
