pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::insight::InsightService;
use crate::notify::CompositeNotifier;
use crate::store::ResultStore;

/// Shared by every handler. Handlers only read from the store.
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
    pub target_url: Arc<str>,
    pub insight: InsightService,
    pub notifier: CompositeNotifier,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/status", get(handlers::status))
        .route("/alerts", get(handlers::alerts))
        .route("/insight", get(handlers::insight))
        .route("/chat", post(handlers::chat))
        .route("/summary", post(handlers::summary))
        .route("/start-monitoring", post(handlers::start_monitoring))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
