mod config;
mod handlers;
mod models;
mod page;
mod rate_limit;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use config::Config;
use rate_limit::{rate_limit_page, rate_limit_submit, RateLimitConfig, RateLimiter};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub default_currency: String,
    pub started_at: Instant,
}

/// Rate limit cleanup interval (seconds).
const RATE_LIMIT_CLEANUP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let state = Arc::new(AppState {
        default_currency: config.default_currency.clone(),
        started_at: Instant::now(),
    });

    let rate_limiter = default_rate_limiter().trust_forwarded_for(config.trust_forwarded_for);
    if config.trust_forwarded_for {
        tracing::info!("Rate limiting by X-Forwarded-For");
    }

    // ── Background task: cleanup stale rate limit entries ──
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(RATE_LIMIT_CLEANUP_SECS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    let app = router(state, rate_limiter);

    let addr = config.addr();
    tracing::info!("DemoPay server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn default_rate_limiter() -> RateLimiter {
    RateLimiter::new(
        RateLimitConfig {
            max_requests: 60,
            window: Duration::from_secs(60),
        },
        RateLimitConfig {
            max_requests: 10,
            window: Duration::from_secs(60),
        },
    )
}

fn router(state: Arc<AppState>, rate_limiter: RateLimiter) -> Router {
    // 1. No-limit: health + static result pages
    let open_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/result/success", get(handlers::pay::result_success))
        .route("/result/fail", get(handlers::pay::result_fail));

    // 2. Payment page
    let page_routes = Router::new()
        .route("/pay", get(handlers::pay::pay_page))
        .layer(from_fn_with_state(rate_limiter.clone(), rate_limit_page));

    // 3. Form submission
    let submit_routes = Router::new()
        .route("/pay/submit", post(handlers::pay::pay_submit))
        .layer(from_fn_with_state(rate_limiter, rate_limit_submit));

    Router::new()
        .merge(open_routes)
        .merge(page_routes)
        .merge(submit_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let state = Arc::new(AppState {
            default_currency: "BGN".into(),
            started_at: Instant::now(),
        });
        router(state, default_rate_limiter())
    }

    fn submit(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/pay/submit")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn location(body: &'static str) -> String {
        let resp = app().oneshot(submit(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        resp.headers()[header::LOCATION].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_submit_success_is_paid() {
        assert_eq!(
            location("order_id=123&action=success&return_url=https%3A%2F%2Ft.me%2Fdemo_bot").await,
            "https://t.me/demo_bot?status=paid&order_id=123"
        );
    }

    #[tokio::test]
    async fn test_submit_fail_is_failed() {
        assert_eq!(
            location("order_id=7&action=fail&return_url=https%3A%2F%2Ft.me%2Fdemo_bot").await,
            "https://t.me/demo_bot?status=failed&order_id=7"
        );
    }

    #[tokio::test]
    async fn test_submit_other_action_is_canceled() {
        assert_eq!(
            location("order_id=7&action=cancel&return_url=https%3A%2F%2Ft.me%2Fdemo_bot").await,
            "https://t.me/demo_bot?status=canceled&order_id=7"
        );
        assert_eq!(
            location("order_id=7&return_url=https%3A%2F%2Ft.me%2Fdemo_bot").await,
            "https://t.me/demo_bot?status=canceled&order_id=7"
        );
    }

    #[tokio::test]
    async fn test_submit_without_return_url_uses_result_pages() {
        assert_eq!(location("order_id=1&action=success").await, "/result/success");
        assert_eq!(location("order_id=1&action=fail&return_url=").await, "/result/fail");
        assert_eq!(location("order_id=1&action=cancel").await, "/result/fail");
    }

    #[tokio::test]
    async fn test_pay_page_renders_amount() {
        let req = Request::builder()
            .uri("/pay?order_id=123&amount=6000&return_url=https%3A%2F%2Ft.me%2Fdemo_bot")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("60.00 BGN"));
        assert!(html.contains("https://t.me/demo_bot"));
    }

    #[tokio::test]
    async fn test_pay_page_requires_order_and_amount() {
        let req = Request::builder()
            .uri("/pay?amount=6000")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_rotating_forwarded_header_does_not_bypass_limit() {
        let app = app();
        for i in 0..11 {
            let mut req = submit("action=success");
            req.headers_mut()
                .insert("x-forwarded-for", format!("198.51.100.{}", i).parse().unwrap());
            let resp = app.clone().oneshot(req).await.unwrap();
            let expected = if i < 10 {
                StatusCode::FOUND
            } else {
                StatusCode::TOO_MANY_REQUESTS
            };
            assert_eq!(resp.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_submit_rate_limited() {
        let app = app();
        for _ in 0..10 {
            let resp = app.clone().oneshot(submit("action=success")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::FOUND);
        }
        let resp = app.oneshot(submit("action=success")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));
    }
}
