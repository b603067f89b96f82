//! Probe module for uptime monitoring.
//!
//! A probe is a single timed HTTP HEAD request. There is no retry and no
//! error path: every attempt produces exactly one `Outcome` value, with
//! status code 0 standing in for "no HTTP response obtained".

mod http;

pub use http::*;

/// Build the shared HTTP client used for all probes.
///
/// Constructed once at startup and handed to the cycle runner; per-probe
/// timeouts are applied on each request, not on the client.
pub fn build_client() -> reqwest::Client {
    reqwest::Client::new()
}
