pub mod risks;

use axum::{http::StatusCode, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::{metrics, state::AppState};

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics_handler() -> (StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: health, metrics and the `/v1/risks` API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    metrics::init();

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler));

    let v1 = Router::new()
        .route("/v1/risks", get(risks::list).post(risks::create))
        .route("/v1/risks/:id", get(risks::get));

    public
        .merge(v1)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
