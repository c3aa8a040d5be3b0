use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{Notifier, NotifyError, StatusEvent};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts a plain `{"text": ...}` message to a Slack incoming webhook.
pub struct SlackNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, event: &StatusEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": event.summary() }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
