use std::sync::Arc;

use anyhow::Result;
use azure_app_exporter::azure::applications::cache::ApplicationCache;
use azure_app_exporter::azure::applications::updater::ApplicationsUpdater;
use azure_app_exporter::azure::token::{token_endpoint, TokenStore, TokenUpdater};
use azure_app_exporter::config::loader;
use azure_app_exporter::server;
use azure_app_exporter::utils::logging;
use azure_app_exporter::utils::logging::LogLevel;
use clap::Parser;
use reqwest::Client;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "SETTINGS", default_value = "azure-app-exporter.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load settings, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = Arc::new(loader::run(&args.config).await?);
    logging::run(&service_config, args.log_level)?;

    if service_config.debug.no_verify_tls {
        warn!("flag no_verify_tls is enabled, CERTIFICATES ON FOREIGN API REQUESTS WILL NOT BE VALIDATED!");
    }

    // -------------------------------
    // 2. Create request client
    // -------------------------------

    let client = Client::builder()
        .danger_accept_invalid_certs(service_config.debug.no_verify_tls)
        .build()?;

    // -------------------------------
    // 3. Spawn token renewal and application refresh loops
    // -------------------------------

    let token_store = TokenStore::new();
    let applications = ApplicationCache::new();

    if service_config.applications.enabled {
        let token_updater = TokenUpdater::new(
            client.clone(),
            token_endpoint(&service_config.credentials.tenant_id),
            &service_config.credentials,
            token_store.clone(),
        );
        tokio::spawn(token_updater.run());

        let applications_updater = ApplicationsUpdater::new(
            client,
            &service_config.applications,
            token_store,
            applications.clone(),
        );
        tokio::spawn(applications_updater.run());
    }

    // -------------------------------
    // 4. Start http server
    // -------------------------------

    info!("Service starting...");
    server::server::start(service_config, applications).await
}
