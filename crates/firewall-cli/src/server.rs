//! `axum`-based HTTP service: `/health` and `/validate`, behind a per-IP
//! sliding-window rate limiter.

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use firewall_core::ValidationResult;
use firewall_pipeline::ValidationPipeline;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Requests allowed per client IP within [`RATE_WINDOW`].
const RATE_LIMIT: usize = 60;
/// Sliding window over which [`RATE_LIMIT`] is enforced.
const RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct AppState {
    pipeline: Arc<ValidationPipeline>,
    rate_limiter: Arc<RateLimiter>,
    metrics: Arc<Metrics>,
}

/// Plain request/validation counters exposed at `/metrics`.
#[derive(Default)]
struct Metrics {
    requests_served: AtomicU64,
    validations_run: AtomicU64,
    rate_limit_rejections: AtomicU64,
}

/// Per-IP sliding-window rate limiter: each client's recent request
/// timestamps are pruned to the window on every check.
struct RateLimiter {
    requests: Mutex<HashMap<SocketAddr, Vec<Instant>>>,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    async fn check(&self, client: SocketAddr) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;
        let entry = requests.entry(client).or_default();
        entry.retain(|t| now.duration_since(*t) < RATE_WINDOW);

        if entry.len() >= RATE_LIMIT {
            return false;
        }
        entry.push(now);
        true
    }
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    code: String,
    #[serde(default = "default_file_path")]
    file_path: String,
    language: Option<String>,
}

fn default_file_path() -> String {
    "<api>".to_string()
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let file_path = match &request.language {
        Some(language) => format!("{}.{language}", request.file_path),
        None => request.file_path,
    };
    let result: ValidationResult = state.pipeline.validate_code(&request.code, &file_path).await;
    state.metrics.validations_run.fetch_add(1, Ordering::Relaxed);
    Json(result).into_response()
}

async fn metrics(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "requests_served": state.metrics.requests_served.load(Ordering::Relaxed),
        "validations_run": state.metrics.validations_run.load(Ordering::Relaxed),
        "rate_limit_rejections": state.metrics.rate_limit_rejections.load(Ordering::Relaxed),
    }))
}

async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    state.metrics.requests_served.fetch_add(1, Ordering::Relaxed);
    if !state.rate_limiter.check(addr).await {
        state.metrics.rate_limit_rejections.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(client = %addr, "rate limit exceeded");
        return (StatusCode::TOO_MANY_REQUESTS, Json(serde_json::json!({
            "detail": "Rate limit exceeded",
        })))
            .into_response();
    }
    next.run(request).await
}

/// Builds the axum router: `/health`, `/validate`, `/metrics`, and the rate-limit layer.
pub fn build_router(pipeline: ValidationPipeline) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline),
        rate_limiter: Arc::new(RateLimiter::new()),
        metrics: Arc::new(Metrics::default()),
    };

    Router::new()
        .route("/health", get(health))
        .route("/validate", post(validate))
        .route("/metrics", get(metrics))
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_allows_under_limit() {
        let limiter = RateLimiter::new();
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        for _ in 0..RATE_LIMIT {
            assert!(limiter.check(addr).await);
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new();
        let addr: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        for _ in 0..RATE_LIMIT {
            assert!(limiter.check(addr).await);
        }
        assert!(!limiter.check(addr).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_tracks_clients_independently() {
        let limiter = RateLimiter::new();
        let a: SocketAddr = "127.0.0.1:9002".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:9003".parse().unwrap();
        for _ in 0..RATE_LIMIT {
            assert!(limiter.check(a).await);
        }
        assert!(limiter.check(b).await);
    }
}
