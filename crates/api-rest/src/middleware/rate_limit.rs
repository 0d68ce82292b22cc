//! Rate limiting middleware.
//!
//! In-memory sliding-window limiter keyed by client IP, evaluated
//! independently per request with no cross-client ordering guarantee. A
//! single-process deployment needs nothing more; a multi-instance
//! deployment would move the window into Redis.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    response::IntoResponse,
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tower::{Layer, Service};
use tracing::warn;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,

    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: u32) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

/// Sliding-window counters per client address.
#[derive(Debug)]
struct RateLimiter {
    requests: HashMap<IpAddr, Vec<Instant>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: HashMap::new(),
            config,
        }
    }

    fn check_rate_limit(&mut self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let window_start = now - self.config.window;

        let requests = self.requests.entry(ip).or_default();
        requests.retain(|&timestamp| timestamp > window_start);

        if requests.len() >= self.config.max_requests as usize {
            return false;
        }

        requests.push(now);
        true
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        let window_start = now - self.config.window;

        self.requests.retain(|_, requests| {
            requests.retain(|&timestamp| timestamp > window_start);
            !requests.is_empty()
        });
    }
}

/// Layer for rate limiting
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<RwLock<RateLimiter>>,
}

impl RateLimitLayer {
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::default())
    }

    pub fn with_config(config: RateLimitConfig) -> Self {
        Self {
            limiter: Arc::new(RwLock::new(RateLimiter::new(config))),
        }
    }
}

impl Default for RateLimitLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Service that performs rate limiting
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<RwLock<RateLimiter>>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Behind a proxy the connect info is the proxy; X-Forwarded-For
            // handling belongs in the proxy layer config, not here.
            let ip = req
                .extensions()
                .get::<std::net::SocketAddr>()
                .map(|addr| addr.ip())
                .unwrap_or_else(|| IpAddr::from([127, 0, 0, 1]));

            let allowed = {
                let mut limiter = limiter.write();
                limiter.check_rate_limit(ip)
            };

            if !allowed {
                warn!(client_ip = %ip, "Rate limit exceeded");
                let response =
                    (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response();
                return Ok(response);
            }

            // Occasionally prune idle clients so the map stays bounded
            if rand::random::<f32>() < 0.01 {
                limiter.write().cleanup();
            }

            inner.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_limits_and_recovers() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_millis(50),
        });
        let ip = IpAddr::from([10, 0, 0, 1]);

        assert!(limiter.check_rate_limit(ip));
        assert!(limiter.check_rate_limit(ip));
        assert!(!limiter.check_rate_limit(ip));

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check_rate_limit(ip));
    }

    #[test]
    fn clients_are_independent() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });

        assert!(limiter.check_rate_limit(IpAddr::from([10, 0, 0, 1])));
        assert!(!limiter.check_rate_limit(IpAddr::from([10, 0, 0, 1])));
        assert!(limiter.check_rate_limit(IpAddr::from([10, 0, 0, 2])));
    }

    #[test]
    fn cleanup_drops_idle_clients() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 5,
            window: Duration::from_millis(10),
        });
        limiter.check_rate_limit(IpAddr::from([10, 0, 0, 1]));

        std::thread::sleep(Duration::from_millis(20));
        limiter.cleanup();
        assert!(limiter.requests.is_empty());
    }
}
