//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request handlers:
//! response headers, content types, conditional requests, path resolution, body types
//! and response builders.

pub mod body;
pub mod cache;
pub mod headers;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use body::ResponseBody;
pub use headers::apply_response_headers;
pub use path::{directory_uri, resolve_request_path, ResolveError};
pub use response::{
    build_301_response, build_304_response, build_403_response, build_404_response,
    build_405_response, build_500_response, build_html_response, build_options_response,
};
