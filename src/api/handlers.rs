use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use super::dto::{
    ChatRequest, ChatResponse, InsightResponse, MonitorRequest, MonitorResponse, RootResponse,
    SummaryRequest, SummaryResponse,
};
use super::error::ApiError;
use super::AppState;
use crate::config::app_config::validate_url;
use crate::notify::StatusEvent;

const CHAT_FAILED: &str = "Chat failed. Please try again.";

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "SitePulse backend is running.",
    })
}

/// Latest probe result for the monitored site, or `{}` before the first probe.
pub async fn status(State(state): State<AppState>) -> Response {
    match state.store.latest(&state.target_url) {
        Some(result) => Json(result.as_ref()).into_response(),
        None => Json(json!({})).into_response(),
    }
}

pub async fn alerts(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.alerts(&state.target_url))
}

pub async fn insight(State(state): State<AppState>) -> Json<InsightResponse> {
    let insight = match state.store.latest(&state.target_url) {
        None => format!("No probe results available yet for {}.", state.target_url),
        Some(result) => match state.insight.insight(&result).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "insight generation failed");
                format!("Insight unavailable: {e}")
            }
        },
    };
    Json(InsightResponse { insight })
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let response = match state.insight.chat(&req.message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "chat completion failed");
            CHAT_FAILED.to_string()
        }
    };
    Ok(Json(ChatResponse { response }))
}

pub async fn summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(req) = payload?;

    let summary = match state.insight.summarize(&req.into()).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "summary generation failed");
            format!("API error: {e}")
        }
    };
    Ok(Json(SummaryResponse { summary }))
}

/// Announces a site to the webhooks. The background monitor keeps probing
/// its configured target only.
pub async fn start_monitoring(
    State(state): State<AppState>,
    payload: Result<Json<MonitorRequest>, JsonRejection>,
) -> Result<Json<MonitorResponse>, ApiError> {
    let Json(req) = payload?;
    validate_url("url", &req.url).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    info!(url = %req.url, "start monitoring requested");
    state
        .notifier
        .broadcast(&StatusEvent::MonitoringStarted {
            url: req.url.clone(),
        })
        .await;

    Ok(Json(MonitorResponse {
        status: "started",
        url: req.url,
    }))
}
