use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{Risk, RiskAttributes, RiskId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::ApiError,
    metrics::{RISKS_CREATED_TOTAL, RISK_LOOKUPS_TOTAL},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskOutput {
    pub risk: Risk,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskListOutput {
    pub risks: Vec<Risk>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedOutput {
    pub id: RiskId,
}

/// `GET /v1/risks/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RiskOutput>, ApiError> {
    let id = RiskId::parse(&raw_id)?;
    RISK_LOOKUPS_TOTAL.with_label_values(&["get"]).inc();
    let risk = state.risks.get_risk(id).await?;
    Ok(Json(RiskOutput { risk }))
}

/// `POST /v1/risks`
///
/// State membership is checked here; the service stores whatever it is handed.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<RiskAttributes>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedOutput>), ApiError> {
    let Json(attrs) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    attrs.validate()?;

    let id = RiskId::new();
    state.risks.create_risk(id, attrs).await?;
    RISKS_CREATED_TOTAL.inc();
    info!(risk_id = %id, "created risk");
    Ok((StatusCode::CREATED, Json(CreatedOutput { id })))
}

/// `GET /v1/risks`
pub async fn list(State(state): State<AppState>) -> Result<Json<RiskListOutput>, ApiError> {
    RISK_LOOKUPS_TOTAL.with_label_values(&["list"]).inc();
    let risks = state.risks.list_risks().await?;
    info!(count = risks.len(), "list risks");
    Ok(Json(RiskListOutput { risks }))
}
