//! coi-serve
//!
//! A small static file server. Every response it produces carries the
//! `Cross-Origin-Embedder-Policy` and `Cross-Origin-Opener-Policy` headers,
//! so pages served from the root can use `SharedArrayBuffer` and other
//! cross-origin isolated browser APIs.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

#[cfg(test)]
mod test_support;
