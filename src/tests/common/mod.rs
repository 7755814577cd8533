// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use reqwest::Client;

use crate::azure::applications::types::{AzureApplication, PasswordCredential};
use crate::config::settings::{
    ApplicationsConfig, ClientSecret, CredentialsConfig, DebugConfig, MetricsConfig, ServerConfig,
    SettingsConfig,
};
use crate::ServiceConfig;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Minimal valid config for wiring handlers and updaters in tests.
pub fn sample_config() -> ServiceConfig {
    ServiceConfig {
        credentials: CredentialsConfig {
            tenant_id: "tenant-123".to_string(),
            client_id: "client-123".to_string(),
            client_secret: ClientSecret::new("s3cr3t"),
        },
        applications: ApplicationsConfig::default(),
        settings: SettingsConfig {
            metrics: MetricsConfig::default(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: "0".to_string(),
            },
            logging: None,
        },
        debug: DebugConfig::default(),
    }
}

pub fn sample_application(
    id: &str,
    password_credentials: Vec<PasswordCredential>,
) -> AzureApplication {
    AzureApplication {
        id: id.to_string(),
        app_id: format!("app-{id}"),
        display_name: Some(format!("display {id}")),
        password_credentials,
    }
}
