use serde::{Deserialize, Serialize};

use crate::insight::prompt::SummaryInput;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub uptime: String,
    pub response_time: String,
    pub seo: String,
    pub ssl: String,
}

impl From<SummaryRequest> for SummaryInput {
    fn from(req: SummaryRequest) -> Self {
        SummaryInput {
            uptime: req.uptime,
            response_time: req.response_time,
            seo: req.seo,
            ssl: req.ssl,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct MonitorRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MonitorResponse {
    pub status: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}
