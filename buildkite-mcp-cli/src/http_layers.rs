//! Middleware for the HTTP transport
//!
//! Layers run outermost first: [`client_ip`], [`log_requests`], then
//! [`require_bearer`] when an auth token is configured.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Proxy headers consulted when the proxy is trusted, highest priority first
const PROXY_HEADERS: [&str; 5] = [
    "cf-connecting-ip",
    "true-client-ip",
    "x-real-ip",
    "x-forwarded-for",
    "x-client-ip",
];

const UNKNOWN_CLIENT: &str = "unknown";

/// Address of the caller, stored in request extensions by [`client_ip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    fn of(request: &Request<Body>) -> &str {
        request
            .extensions()
            .get::<ClientIp>()
            .map(|ip| ip.0.as_str())
            .unwrap_or(UNKNOWN_CLIENT)
    }
}

/// Resolve the client address.
///
/// Without `trust_proxy` the socket address is used as is. With it the proxy
/// headers are checked in priority order, taking the first entry of
/// `X-Forwarded-For`, before falling back to the socket address.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    remote: Option<SocketAddr>,
    trust_proxy: bool,
) -> String {
    let remote = || {
        remote
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    };
    if !trust_proxy {
        return remote();
    }

    for name in PROXY_HEADERS {
        let Some(value) = headers.get(name).and_then(|value| value.to_str().ok()) else {
            continue;
        };
        let value = if name == "x-forwarded-for" {
            value.split(',').next().unwrap_or_default().trim()
        } else {
            value.trim()
        };
        if !value.is_empty() {
            return value.to_string();
        }
    }

    remote()
}

pub async fn client_ip(
    State(trust_proxy): State<bool>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = resolve_client_ip(request.headers(), remote, trust_proxy);
    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}

pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let client_ip = ClientIp::of(&request).to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        client_ip = %client_ip,
        user_agent = %user_agent,
        "HTTP request"
    );
    response
}

/// Reject requests whose `Authorization` header is not `Bearer <token>`
pub async fn require_bearer(
    State(token): State<Arc<str>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|presented| tokens_match(presented.as_bytes(), token.as_bytes()));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(
        client_ip = %ClientIp::of(&request),
        "Unauthorized access attempt to MCP HTTP server"
    );
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

/// Compare without exiting at the first differing byte
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.len() == expected.len()
        && presented
            .iter()
            .zip(expected)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    fn remote() -> Option<SocketAddr> {
        Some("10.0.0.7:51234".parse().unwrap())
    }

    #[test]
    fn test_proxy_headers_ignored_unless_trusted() {
        let forwarded = headers(&[("x-forwarded-for", "203.0.113.9")]);
        assert_eq!(resolve_client_ip(&forwarded, remote(), false), "10.0.0.7:51234");
        assert_eq!(resolve_client_ip(&forwarded, None, false), "unknown");
    }

    #[test]
    fn test_forwarded_for_takes_the_original_client() {
        let chain = headers(&[("x-forwarded-for", " 203.0.113.9 , 10.1.1.1, 10.2.2.2")]);
        assert_eq!(resolve_client_ip(&chain, remote(), true), "203.0.113.9");
    }

    #[test]
    fn test_proxy_header_priority() {
        let nginx = headers(&[
            ("x-client-ip", "198.51.100.4"),
            ("x-forwarded-for", "203.0.113.9"),
            ("x-real-ip", "192.0.2.1"),
        ]);
        assert_eq!(resolve_client_ip(&nginx, remote(), true), "192.0.2.1");

        let cloudflare = headers(&[
            ("cf-connecting-ip", "192.0.2.50"),
            ("true-client-ip", "192.0.2.60"),
        ]);
        assert_eq!(resolve_client_ip(&cloudflare, remote(), true), "192.0.2.50");
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        let blank_first = headers(&[("x-forwarded-for", " ,10.1.1.1"), ("x-client-ip", "198.51.100.4")]);
        assert_eq!(resolve_client_ip(&blank_first, remote(), true), "198.51.100.4");

        let only_empty = headers(&[("x-forwarded-for", "")]);
        assert_eq!(resolve_client_ip(&only_empty, remote(), true), "10.0.0.7:51234");
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match(b"secret", b"secret"));
        assert!(!tokens_match(b"secret", b"secreT"));
        assert!(!tokens_match(b"secret", b"secret2"));
        assert!(!tokens_match(b"", b"secret"));
    }
}
