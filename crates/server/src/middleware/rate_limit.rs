//! Per-IP rate limiting built on `governor` and `tower_governor`.
//!
//! Two tiers are exposed: a strict one for the credential endpoints and a
//! loose one for the rest of the API. Clients are keyed by IP through
//! `SmartIpKeyExtractor`, which reads the usual proxy headers
//! (`X-Forwarded-For`, `X-Real-IP`, `Forwarded`) and falls back to the peer
//! address, so the router has to be served via
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn per_ip_limiter(replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("nonzero replenish interval and burst size");
    GovernorLayer::new(Arc::new(config))
}

/// Limiter for login, registration and password change: a burst of 5, then
/// one request every 6 seconds. Brute forcing credentials through this is
/// roughly 10 attempts per minute per IP.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    per_ip_limiter(6, 5)
}

/// Limiter for catalog, cart and order traffic: a burst of 50, replenishing
/// once per second.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    per_ip_limiter(1, 50)
}
