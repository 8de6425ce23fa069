//! Per-IP rate limiting.
//!
//! Clients are keyed by the peer address from [`ConnectInfo`]. Requests without one
//! (in-process router tests) are not limited.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use edurapor_config::RateLimitConfig;
use edurapor_core::AppError;
use governor::{
    DefaultKeyedRateLimiter, RateLimiter,
    clock::{Clock, DefaultClock},
};
use tracing::warn;

use crate::state::AppState;

pub type IpRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Builds the shared limiter, or `None` when limiting is disabled.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Option<Arc<IpRateLimiter>> {
    config.quota().map(|quota| Arc::new(RateLimiter::keyed(quota)))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let Some(ip) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return next.run(req).await;
    };

    match limiter.check_key(&ip) {
        Ok(()) => next.run(req).await,
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            warn!(client_ip = %ip, retry_after_ms = %wait.as_millis(), "Rate limit exceeded");
            AppError::new(
                StatusCode::TOO_MANY_REQUESTS,
                anyhow::anyhow!("Too many requests. Retry in {} seconds", wait.as_secs().max(1)),
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_builds_no_limiter() {
        assert!(build_rate_limiter(&RateLimitConfig::disabled()).is_none());
    }

    #[test]
    fn test_burst_is_enforced_per_ip() {
        let config = RateLimitConfig {
            enabled: true,
            per_second: 1,
            burst_size: 2,
        };
        let limiter = build_rate_limiter(&config).unwrap();
        let first: IpAddr = "10.0.0.1".parse().unwrap();
        let second: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check_key(&first).is_ok());
        assert!(limiter.check_key(&first).is_ok());
        assert!(limiter.check_key(&first).is_err());
        assert!(limiter.check_key(&second).is_ok());
    }
}
