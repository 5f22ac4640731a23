use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static RISKS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("risk_api_risks_created_total", "Total risks created")
        .expect("register risks_created_total")
});

pub static RISK_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "risk_api_risk_lookups_total",
        "Risk reads by operation",
        &["op"]
    )
    .expect("register risk_lookups_total")
});

pub static REQUEST_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "risk_api_request_errors_total",
        "Failed requests by response status",
        &["status"]
    )
    .expect("register request_errors_total")
});

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

/// Register every metric up front so `/metrics` lists them before first use.
pub fn init() {
    Lazy::force(&RISKS_CREATED_TOTAL);
    Lazy::force(&RISK_LOOKUPS_TOTAL);
    Lazy::force(&REQUEST_ERRORS_TOTAL);
}
