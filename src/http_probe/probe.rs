use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use tracing::debug;
use url::Url;

use super::page::PageParser;
use super::result::{round_seconds, ProbeFailure, ProbeResult, MISSING_META_DESCRIPTION};
use super::tls::cert_validity_days;
use super::{report, Prober};

const USER_AGENT: &str = concat!("sitepulse-probe/", env!("CARGO_PKG_VERSION"));

/// Why a probe could not complete.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),
}

impl ProbeError {
    pub fn failure(&self) -> ProbeFailure {
        match self {
            ProbeError::InvalidUrl(_) => ProbeFailure::InvalidUrl,
            ProbeError::Timeout(_) => ProbeFailure::Timeout,
            ProbeError::Transport(_) => ProbeFailure::Transport,
            ProbeError::Body(_) => ProbeFailure::Body,
        }
    }

    fn from_request(err: reqwest::Error, timeout: Duration, reading_body: bool) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if reading_body {
            ProbeError::Body(err)
        } else {
            ProbeError::Transport(err)
        }
    }
}

/// Building a prober failed.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),
    #[error("invalid selector {0}")]
    Selector(String),
}

/// Fetches a page over HTTP and checks it for basic health signals.
///
/// Redirects are not followed, so a 301 or 302 is reported as is. The fetch
/// and the certificate check share one `timeout` budget.
#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    connector: TokioTlsConnector,
    parser: PageParser,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(connector: TokioTlsConnector, timeout: Duration) -> Result<Self, SetupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            connector,
            parser: PageParser::new()?,
            timeout,
        })
    }

    /// Runs the fetch and parse steps, filling `result` as it goes so that a
    /// failure half way leaves the fields gathered so far in place.
    async fn fetch_into(&self, url: &str, result: &mut ProbeResult) -> Result<(), ProbeError> {
        let parsed_url = Url::parse(url)?;

        let start = Instant::now();
        let response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::from_request(e, self.timeout, false))?;
        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::from_request(e, self.timeout, true))?;
        result.status_code = Some(status);
        result.load_time_seconds = Some(round_seconds(start.elapsed().as_secs_f64()));

        let page = self.parser.extract(&body);
        result.title = page.title;
        match page.meta_description {
            Some(description) => result.meta_description = Some(description),
            None => result.alerts.push(MISSING_META_DESCRIPTION.to_string()),
        }

        if status != 200 {
            result.alerts.push(format!("Non-200 status: {status}"));
        }

        let remaining = self.timeout.saturating_sub(start.elapsed());
        result.cert_validity_days = cert_validity_days(&parsed_url, &self.connector, remaining).await;

        Ok(())
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let mut result = ProbeResult::new(url);

        if let Err(e) = self.fetch_into(url, &mut result).await {
            debug!(url, error = %report(&e), "probe failed");
            result.alerts.push(format!("Error: {}", report(&e)));
            result.failure = Some(e.failure());
        }

        result
    }
}
