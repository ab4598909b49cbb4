//! Rate limiting middleware
//!
//! Limits how often a single client address may hit the login, registration
//! and contact endpoints. Each address gets its own token bucket refilled at
//! `requests_per_minute` with room for `burst` back-to-back requests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::{debug, warn};
use crate::config::RateLimitConfig;
use crate::utils::errors::{ConnectHubError, Result};

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Per-address rate limiter shared by all requests
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<KeyedLimiter>,
}

impl std::fmt::Debug for RateLimitMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitMiddleware")
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.requests_per_minute)
            .ok_or_else(|| ConnectHubError::Config("rate_limit.requests_per_minute must be positive".to_string()))?;
        let burst = NonZeroU32::new(config.burst)
            .ok_or_else(|| ConnectHubError::Config("rate_limit.burst must be positive".to_string()))?;

        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        })
    }

    /// Check if a client is rate limited
    pub fn check(&self, client: IpAddr) -> Result<()> {
        match self.limiter.check_key(&client) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                warn!(client = %client, not_until = ?not_until, "Rate limit exceeded");
                Err(ConnectHubError::RateLimitExceeded)
            }
        }
    }

    /// Forget clients whose buckets have refilled
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(tracked_clients = self.limiter.len(), "Rate limit entries cleaned up");
    }
}

/// Client address: first `X-Forwarded-For` hop, then the socket peer
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or_else(|| peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Reject the request with 429 once the client's bucket is empty
pub async fn limit_by_ip(
    State(limiter): State<RateLimitMiddleware>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_ip(request.headers(), peer);

    limiter.check(client)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    fn limiter(burst: u32) -> RateLimitMiddleware {
        RateLimitMiddleware::new(&RateLimitConfig { requests_per_minute: 1, burst }).unwrap()
    }

    #[test]
    fn test_burst_then_limited() {
        let limiter = limiter(2);
        let client: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(client).is_ok());
        assert!(limiter.check(client).is_ok());
        assert_matches!(limiter.check(client), Err(ConnectHubError::RateLimitExceeded));
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = limiter(1);
        assert!(limiter.check("10.0.0.1".parse().unwrap()).is_ok());
        assert!(limiter.check("10.0.0.2".parse().unwrap()).is_ok());
        assert!(limiter.check("10.0.0.1".parse().unwrap()).is_err());
    }

    #[test]
    fn test_zero_quota_is_a_config_error() {
        let result = RateLimitMiddleware::new(&RateLimitConfig { requests_per_minute: 0, burst: 1 });
        assert_matches!(result, Err(ConnectHubError::Config(_)));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.168.1.5:40000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)), peer.ip());

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7".parse::<IpAddr>().unwrap());

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert_eq!(client_ip(&headers, None), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
