use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Fixes the metrics toggle for the process. Later calls are ignored.
pub fn set_observability_enabled(enabled: bool) {
    let _ = OBSERVABILITY_ENABLED.set(enabled);
}

/// Enabled unless [`set_observability_enabled`] turned it off.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| true)
}

/// Initialize Prometheus metrics exporter with upkeep task
/// Returns None if observability is disabled
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )?
        .install_recorder()?;

    // Spawn upkeep task to clean stale metrics
    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

pub fn track_loan_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("loans_issued_total").increment(1);
}

pub fn track_loan_returned(fine: Decimal) {
    if !is_observability_enabled() {
        return;
    }
    counter!("loans_returned_total").increment(1);
    if fine > Decimal::ZERO {
        counter!("fines_assessed_total").increment(1);
        histogram!("fine_amount").record(fine.to_f64().unwrap_or_default());
    }
}

/// `reason` is one of `unavailable`, `not_found`, `already_returned`.
pub fn track_loan_rejected(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("loan_rejections_total", "reason" => reason).increment(1);
}

pub fn track_seed_rows(collection: &'static str, rows: u64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("seed_rows_imported_total", "collection" => collection).increment(rows);
}

pub fn set_overdue_loans(count: usize) {
    if !is_observability_enabled() {
        return;
    }
    gauge!("overdue_loans").set(count as f64);
}
