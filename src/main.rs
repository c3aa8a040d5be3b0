use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod api;
pub mod config;
pub mod http_probe;
pub mod insight;
pub mod notify;
pub mod scheduler;
pub mod shutdown;
pub mod store;

use api::AppState;
use config::{AppConfig, ConfigError};
use http_probe::prelude::*;
use http_probe::report;
use http_probe::tls::setup_tls_connector;
use insight::{client::OpenAiClient, InsightService};
use notify::{slack::SlackNotifier, zapier::ZapierNotifier, CompositeNotifier, Notifier, NotifyError};
use scheduler::Scheduler;
use store::ResultStore;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("failed to build TLS connector")]
    Tls(#[from] native_tls::Error),
    #[error("failed to build prober")]
    Prober(#[from] SetupError),
    #[error("failed to set up webhook")]
    Webhook(#[from] NotifyError),
    #[error("server error")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitepulse=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!("{}", report(&e));
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    let target = config.monitor.url.clone();

    let notifier = build_notifier(&config)?;
    if notifier.is_empty() {
        info!("No webhooks configured");
    }

    let prober = HttpProber::new(setup_tls_connector()?, config.monitor.timeout)?;
    let store = ResultStore::new();
    Scheduler::new(
        prober,
        store.slot(target.as_str()),
        config.monitor.interval,
        notifier.clone(),
    )
    .start();

    let generator = OpenAiClient::new(
        &config.openai.api_key,
        config.openai.api_base.as_deref(),
        &config.openai.model,
    );
    info!(model = generator.model(), "Using OpenAI model");

    let app = api::router(AppState {
        store,
        target_url: Arc::from(target),
        insight: InsightService::new(Arc::new(generator)),
        notifier,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("SitePulse listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn build_notifier(config: &AppConfig) -> Result<CompositeNotifier, NotifyError> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
    if let Some(url) = &config.webhooks.slack_url {
        notifiers.push(Arc::new(SlackNotifier::new(url.as_str())?));
        info!("Slack notifications enabled");
    }
    if let Some(url) = &config.webhooks.zapier_url {
        notifiers.push(Arc::new(ZapierNotifier::new(url.as_str())?));
        info!("Zapier notifications enabled");
    }
    Ok(CompositeNotifier::new(notifiers))
}
