//! Attendance endpoints: face matching and per-day queries

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::attendance::{AttendanceRecord, EventResult};

/// Face match request: one captured camera frame
#[derive(Deserialize)]
pub struct MatchRequest {
    /// Base64-encoded probe image (JPEG or PNG)
    pub image: String,
}

/// Face match response
#[derive(Serialize)]
pub struct MatchResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventResult>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl MatchResponse {
    /// An unmatched probe: no attendance recorded
    fn no_match() -> Self {
        Self {
            matched: false,
            name: None,
            image_url: None,
            status: None,
            check_in_time: None,
            check_out_time: None,
            date: None,
        }
    }
}

/// Per-day attendance query response
#[derive(Serialize)]
pub struct TodayResponse {
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub date: String,
}

impl From<&AttendanceRecord> for TodayResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            check_in_time: record.check_in.map(|t| t.to_string()),
            check_out_time: record.check_out.map(|t| t.to_string()),
            date: record.date.to_string(),
        }
    }
}

/// Match a probe frame and record an attendance event
async fn match_face(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, StatusCode> {
    let probe = base64::engine::general_purpose::STANDARD
        .decode(&request.image)
        .map_err(|e| {
            tracing::warn!(error = %e, "rejecting malformed probe frame");
            StatusCode::BAD_REQUEST
        })?;

    let resolver = state.resolver.as_ref().ok_or_else(|| {
        tracing::warn!("face matching not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let resolved = resolver.resolve(&probe).await.map_err(|e| {
        tracing::error!(error = %e, "identity resolution failed");
        StatusCode::BAD_GATEWAY
    })?;

    let Some(person_id) = resolved else {
        return Ok(Json(MatchResponse::no_match()));
    };

    // Serialize the read-modify-write against concurrent triggers
    let mut ledger = state.ledger.lock().await;
    let now = state.clock.now();

    let status = ledger.record_event(&person_id, now).map_err(|e| {
        tracing::error!(person = %person_id, error = %e, "attendance event not committed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let record = ledger.query_on(&person_id, now.date());
    drop(ledger);

    let image_url = state
        .gallery
        .file_name(&person_id)
        .map(|file| format!("/profile/{file}"));

    Ok(Json(MatchResponse {
        matched: true,
        name: Some(person_id),
        image_url,
        status: Some(status),
        check_in_time: record
            .as_ref()
            .and_then(|r| r.check_in.map(|t| t.to_string())),
        check_out_time: record
            .as_ref()
            .and_then(|r| r.check_out.map(|t| t.to_string())),
        date: record.as_ref().map(|r| r.date.to_string()),
    }))
}

/// Get a person's attendance record for the current date
async fn today(
    State(state): State<Arc<ApiState>>,
    Path(person_id): Path<String>,
) -> Result<Json<TodayResponse>, StatusCode> {
    let ledger = state.ledger.lock().await;

    ledger
        .query_today(&person_id)
        .as_ref()
        .map(|record| Json(TodayResponse::from(record)))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Build attendance router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/attendance/match", post(match_face))
        .route("/api/attendance/{person_id}/today", get(today))
        .with_state(state)
}
