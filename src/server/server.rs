use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::azure::applications::{api, cache::ApplicationCache};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::ServiceConfig;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub applications: ApplicationCache,
    pub settings: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(
        metrics: &Metrics,
        applications: ApplicationCache,
        settings: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            applications,
            settings,
        }
    }
}

pub fn app_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(state.metrics_state.router(&state.settings.settings.metrics))
        .merge(api::router())
        .route("/api/settings", get(api_settings))
}

/// Show the exporter settings; the client secret serializes masked.
async fn api_settings(State(state): State<AppState>) -> Json<ServiceConfig> {
    Json(state.settings.as_ref().clone())
}

/// Start one axum server carrying the metrics exposition, the application
/// read API, and the settings endpoint.
pub async fn start(
    service_config: Arc<ServiceConfig>,
    applications: ApplicationCache,
) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, applications, service_config.clone());

    let app = app_router(&state).with_state(state);

    let bind_addr = &service_config.settings.server.host;
    let port = &service_config.settings.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;

    info!("beginning to serve on {}:{}", bind_addr, port);
    info!(
        "metrics endpoint: {}:{}{}",
        bind_addr, port, service_config.settings.metrics.path
    );
    metrics.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}
