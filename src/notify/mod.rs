pub mod slack;
pub mod zapier;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;
use unicode_truncate::UnicodeTruncateStr;

use crate::http_probe::result::ProbeResult;

/// Upper bound, in display columns, for text sent to chat webhooks.
const MAX_MESSAGE_WIDTH: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed")]
    Request(#[from] reqwest::Error),
    #[error("webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Something worth telling the outside world about.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    MonitoringStarted {
        url: String,
    },
    AlertsRaised {
        url: String,
        status_code: Option<u16>,
        alerts: Vec<String>,
    },
    Recovered {
        url: String,
    },
}

impl StatusEvent {
    pub fn alerts_raised(result: &ProbeResult) -> Self {
        StatusEvent::AlertsRaised {
            url: result.url.clone(),
            status_code: result.status_code,
            alerts: result.alerts.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::MonitoringStarted { .. } => "start_monitoring",
            StatusEvent::AlertsRaised { .. } => "site_alerts",
            StatusEvent::Recovered { .. } => "site_recovered",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            StatusEvent::MonitoringStarted { url }
            | StatusEvent::AlertsRaised { url, .. }
            | StatusEvent::Recovered { url } => url,
        }
    }

    /// One line of human readable text.
    pub fn summary(&self) -> String {
        let text = match self {
            StatusEvent::MonitoringStarted { url } => format!("Monitoring started for: {url}"),
            StatusEvent::AlertsRaised { url, alerts, .. } => {
                format!("Alerts for {url}: {}", alerts.join("; "))
            }
            StatusEvent::Recovered { url } => format!("All alerts cleared for: {url}"),
        };
        truncate(&text)
    }

    pub fn data(&self) -> Value {
        match self {
            StatusEvent::MonitoringStarted { url } | StatusEvent::Recovered { url } => {
                json!({ "url": url })
            }
            StatusEvent::AlertsRaised {
                url,
                status_code,
                alerts,
            } => json!({
                "url": url,
                "status_code": status_code,
                "alerts": alerts,
            }),
        }
    }
}

fn truncate(text: &str) -> String {
    let (truncated, _) = text.unicode_truncate(MAX_MESSAGE_WIDTH);
    if truncated.len() == text.len() {
        truncated.to_string()
    } else {
        format!("{truncated}…")
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &StatusEvent) -> Result<(), NotifyError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

/// Best-effort fan out to every configured webhook. Failures are logged and
/// never reach the caller.
#[derive(Clone, Default)]
pub struct CompositeNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub async fn broadcast(&self, event: &StatusEvent) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(event).await {
                warn!(
                    notifier = notifier.name(),
                    event = event.name(),
                    error = %e,
                    "notification failed"
                );
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingNotifier;
    use super::*;

    #[test]
    fn test_event_names_and_summaries() {
        let started = StatusEvent::MonitoringStarted {
            url: "https://example.com".to_string(),
        };
        assert_eq!(started.name(), "start_monitoring");
        assert_eq!(started.summary(), "Monitoring started for: https://example.com");
        assert_eq!(started.data(), json!({ "url": "https://example.com" }));

        let raised = StatusEvent::AlertsRaised {
            url: "https://example.com".to_string(),
            status_code: Some(500),
            alerts: vec![
                "Missing meta description".to_string(),
                "Non-200 status: 500".to_string(),
            ],
        };
        assert_eq!(raised.name(), "site_alerts");
        assert_eq!(
            raised.summary(),
            "Alerts for https://example.com: Missing meta description; Non-200 status: 500"
        );
        assert_eq!(raised.data()["status_code"], 500);
        assert_eq!(raised.data()["alerts"][1], "Non-200 status: 500");

        let recovered = StatusEvent::Recovered {
            url: "https://example.com".to_string(),
        };
        assert_eq!(recovered.name(), "site_recovered");
        assert_eq!(recovered.url(), "https://example.com");
    }

    #[test]
    fn test_long_summary_is_truncated() {
        let event = StatusEvent::AlertsRaised {
            url: "https://example.com".to_string(),
            status_code: None,
            alerts: vec!["x".repeat(5000)],
        };
        let summary = event.summary();
        assert!(summary.ends_with('…'));
        assert!(summary.chars().count() <= MAX_MESSAGE_WIDTH + 1);
    }

    #[tokio::test]
    async fn test_composite_keeps_going_after_failure() {
        let failing = Arc::new(RecordingNotifier::failing());
        let healthy = Arc::new(RecordingNotifier::default());
        let composite = CompositeNotifier::new(vec![failing.clone(), healthy.clone()]);

        let event = StatusEvent::Recovered {
            url: "https://example.com".to_string(),
        };
        composite.broadcast(&event).await;

        assert_eq!(failing.events(), vec![event.clone()]);
        assert_eq!(healthy.events(), vec![event]);
    }

    #[tokio::test]
    async fn test_empty_composite_is_noop() {
        let composite = CompositeNotifier::default();
        assert!(composite.is_empty());
        composite
            .broadcast(&StatusEvent::MonitoringStarted {
                url: "https://example.com".to_string(),
            })
            .await;
    }
}
