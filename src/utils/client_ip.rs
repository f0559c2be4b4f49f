//! Client IP extraction from HTTP requests.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Best-effort client IP address of the current request.
///
/// When the service runs behind a trusted reverse proxy
/// (`AppState::behind_proxy`), the first `X-Forwarded-For` entry or
/// `X-Real-IP` is used. Otherwise the socket peer address is used. The
/// value is `None` if neither source is available, which happens for
/// in-process test transports.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIp(pub Option<IpAddr>);

impl ClientIp {
    pub fn into_string(self) -> Option<String> {
        self.0.map(|ip| ip.to_string())
    }
}

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.behind_proxy
            && let Some(ip) = extract_ip_from_headers(&parts.headers)
        {
            return Ok(ClientIp(Some(ip)));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(ClientIp(peer))
    }
}

/// Extracts the originating client IP from proxy headers.
///
/// `X-Forwarded-For` takes priority; its left-most valid entry is the
/// original client. Falls back to `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').find_map(|part| part.trim().parse().ok()));

    forwarded.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let ip = extract_ip_from_headers(&headers).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_skips_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("unknown, 198.51.100.2"),
        );

        let ip = extract_ip_from_headers(&headers).unwrap();
        assert_eq!(ip.to_string(), "198.51.100.2");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));

        let ip = extract_ip_from_headers(&headers).unwrap();
        assert_eq!(ip.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_no_headers() {
        assert!(extract_ip_from_headers(&HeaderMap::new()).is_none());
    }
}
