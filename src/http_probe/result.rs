use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MISSING_META_DESCRIPTION: &str = "Missing meta description";

/// Category of the error that cut a probe short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    InvalidUrl,
    Timeout,
    Transport,
    Body,
}

/// Outcome of a single probe. Built once per cycle and never mutated after
/// it has been published to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub status_code: Option<u16>,
    #[serde(rename = "load_time")]
    pub load_time_seconds: Option<f64>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub alerts: Vec<String>,
    pub cert_validity_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,
}

impl ProbeResult {
    /// An empty result for `url`, stamped with the current time.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timestamp: Utc::now(),
            status_code: None,
            load_time_seconds: None,
            title: None,
            meta_description: None,
            alerts: Vec::new(),
            cert_validity_days: None,
            failure: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Rounds a duration in seconds to two decimal places.
pub fn round_seconds(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
