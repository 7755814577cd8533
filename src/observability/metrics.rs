use std::sync::Arc;

use prometheus::{
    GaugeVec, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry,
};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token renewal loop
    pub token_update_duration: Histogram,
    pub token_update_failures: IntCounter,

    // Applications refresh loop
    pub applications_update_duration: Histogram,
    pub applications_update_failures: IntCounter,

    // One series per cached password credential
    pub password_remaining_seconds: GaugeVec,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_update_duration: Histogram::with_opts(HistogramOpts::new("azure_api_token_update_duration_seconds", "How many seconds it takes to update the Azure API token.")).unwrap(),
            token_update_failures: IntCounter::new("azure_api_token_update_failures", "How many times updating the Azure API token has failed.").unwrap(),

            applications_update_duration: Histogram::with_opts(HistogramOpts::new("azure_applications_update_duration_seconds", "How many seconds it takes to update the in-memory cache of Azure applications.")).unwrap(),
            applications_update_failures: IntCounter::new("azure_applications_update_failures", "How many times updating the cached Azure applications has failed.").unwrap(),

            password_remaining_seconds: GaugeVec::new(Opts::new("azure_application_password_remaining_seconds", "Seconds remaining until the password credential expires."), &["id", "app_id", "app_display_name", "password_key_id", "password_display_name", "password_end_date_time"]).unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_update_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_update_failures.clone())).unwrap();
        reg.register(Box::new(metrics.applications_update_duration.clone())).unwrap();
        reg.register(Box::new(metrics.applications_update_failures.clone())).unwrap();
        reg.register(Box::new(metrics.password_remaining_seconds.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
