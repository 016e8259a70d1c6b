use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::ApiResponse;

/// Limits for one group of routes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Rendering the payment page.
    Page,
    /// Submitting the payment form.
    Submit,
}

#[derive(Debug)]
struct Bucket {
    config: RateLimitConfig,
    hits: DashMap<IpAddr, VecDeque<Instant>>,
}

impl Bucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: DashMap::new(),
        }
    }
}

/// In-memory per-IP sliding window limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    page: Arc<Bucket>,
    submit: Arc<Bucket>,
    trust_forwarded: bool,
}

impl RateLimiter {
    pub fn new(page: RateLimitConfig, submit: RateLimitConfig) -> Self {
        Self {
            page: Arc::new(Bucket::new(page)),
            submit: Arc::new(Bucket::new(submit)),
            trust_forwarded: false,
        }
    }

    /// Key clients by X-Forwarded-For. Only safe behind a proxy that sets it.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    fn bucket(&self, tier: Tier) -> &Bucket {
        match tier {
            Tier::Page => &self.page,
            Tier::Submit => &self.submit,
        }
    }

    /// `Err(retry_after_secs)` when `ip` has used up the tier's window.
    pub fn check(&self, tier: Tier, ip: IpAddr) -> Result<(), u64> {
        let bucket = self.bucket(tier);
        let now = Instant::now();
        let mut hits = bucket.hits.entry(ip).or_default();

        while hits
            .front()
            .is_some_and(|t| now.duration_since(*t) >= bucket.config.window)
        {
            hits.pop_front();
        }

        if let Some(oldest) = hits.front() {
            if hits.len() >= bucket.config.max_requests {
                let retry_after = (*oldest + bucket.config.window)
                    .saturating_duration_since(now)
                    .as_secs()
                    .max(1);
                return Err(retry_after);
            }
        }

        hits.push_back(now);
        Ok(())
    }

    /// Drop IPs with no hits inside their window.
    pub fn cleanup(&self) {
        let now = Instant::now();
        for bucket in [&self.page, &self.submit] {
            let window = bucket.config.window;
            bucket.hits.retain(|_ip, hits| {
                hits.retain(|t| now.duration_since(*t) < window);
                !hits.is_empty()
            });
        }
    }
}

/// Peer address, or the first X-Forwarded-For address when `trust_forwarded`.
pub fn client_ip(req: &Request, trust_forwarded: bool) -> IpAddr {
    if trust_forwarded {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|ip| ip.trim().parse().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = ApiResponse::<()>::error(format!(
        "Too many requests. Try again in {} seconds",
        retry_after
    ));
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", retry_after.to_string())],
        Json(body),
    )
        .into_response()
}

async fn limit(limiter: &RateLimiter, tier: Tier, req: Request, next: Next) -> Response {
    let ip = client_ip(&req, limiter.trust_forwarded);
    match limiter.check(tier, ip) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(%ip, ?tier, retry_after, "Rate limited");
            too_many_requests(retry_after)
        }
    }
}

pub async fn rate_limit_page(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    limit(&limiter, Tier::Page, req, next).await
}

pub async fn rate_limit_submit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    limit(&limiter, Tier::Submit, req, next).await
}
