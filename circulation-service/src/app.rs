use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use common_observability::CirculationMetrics;
use prometheus::{Encoder, TextEncoder};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::catalog_handlers::{create_item, list_items, resize_copies};
use crate::loan_handlers::{active_loan_count, borrow_item, list_loans, list_overdue, return_loan};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub loan_limit: i64,
    pub loan_period_days: i64,
    pub metrics: Arc<CirculationMetrics>,
}

pub async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let families = state.metrics.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        StatusCode::OK,
        String::from_utf8_lossy(&buf).to_string(),
    )
}

async fn error_metrics_mw(
    State(metrics): State<Arc<CirculationMetrics>>,
    req: axum::http::Request<Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics
            .http_errors_total
            .with_label_values(&["circulation-service", code, status.as_str()])
            .inc();
    }
    resp
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:5173",
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-tenant-id"),
            HeaderName::from_static("x-member-id"),
            HeaderName::from_static("x-roles"),
            HeaderName::from_static("x-trace-id"),
        ]);

    let metrics = state.metrics.clone();

    Router::new()
        .route("/healthz", get(health))
        .route("/items", post(create_item).get(list_items))
        .route("/items/:item_id/copies", put(resize_copies))
        .route("/loans", post(borrow_item).get(list_loans))
        .route("/loans/overdue", get(list_overdue))
        .route("/loans/:loan_id/return", post(return_loan))
        .route("/members/:member_id/loans/active_count", get(active_loan_count))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(cors)
}
