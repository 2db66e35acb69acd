//! UI listener endpoints for assistant speech
//!
//! The assistant posts every spoken line here; the kiosk UI polls the
//! latest message to display it.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;

/// Spoken-text notification
#[derive(Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

/// Acknowledgement
#[derive(Serialize)]
pub struct SpeakResponse {
    pub status: &'static str,
}

/// Latest assistant message
#[derive(Serialize)]
pub struct LatestResponse {
    pub text: String,
}

/// Store the latest spoken line
async fn speak(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SpeakRequest>,
) -> Json<SpeakResponse> {
    tracing::debug!(text = %request.text, "UI message received");
    *state.latest_message.write().await = request.text;
    Json(SpeakResponse { status: "ok" })
}

/// Get the latest spoken line
async fn latest(State(state): State<Arc<ApiState>>) -> Json<LatestResponse> {
    Json(LatestResponse {
        text: state.latest_message.read().await.clone(),
    })
}

/// Build speak router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/speak", post(speak))
        .route("/api/speak/latest", get(latest))
        .with_state(state)
}
