//! Response headers added to every reply
//!
//! `Cross-Origin-Embedder-Policy: require-corp` together with
//! `Cross-Origin-Opener-Policy: same-origin` puts the served pages into a
//! cross-origin isolated context, which browsers require before exposing
//! `SharedArrayBuffer` and high resolution timers.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

pub const EMBEDDER_POLICY: &str = "cross-origin-embedder-policy";
pub const EMBEDDER_POLICY_VALUE: &str = "require-corp";
pub const OPENER_POLICY: &str = "cross-origin-opener-policy";
pub const OPENER_POLICY_VALUE: &str = "same-origin";

/// Stamp the isolation headers and the `Server` header onto a response.
///
/// Existing values are overwritten, so whatever built the response cannot
/// weaken the isolation policy.
pub fn apply_response_headers<B>(response: &mut Response<B>, server_name: &str) {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(EMBEDDER_POLICY),
        HeaderValue::from_static(EMBEDDER_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static(OPENER_POLICY),
        HeaderValue::from_static(OPENER_POLICY_VALUE),
    );

    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            headers.insert(hyper::header::SERVER, value);
        }
        Err(_) => crate::logger::log_debug(&format!(
            "Skipping Server header, invalid value: {server_name:?}"
        )),
    }
}
