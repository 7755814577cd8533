use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::config::settings::CredentialsConfig;
use crate::error::AuthError;
use crate::observability::metrics::get_metrics;

/// Sleep for 90% of the token's validity so it never expires mid-use.
const RENEWAL_SAFETY_FACTOR: f64 = 0.9;
/// Fixed retry delay after a failed renewal.
const RENEWAL_RETRY_BACKOFF: Duration = Duration::from_secs(30);

const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// https://learn.microsoft.com/en-us/graph/auth-v2-service#4-request-an-access-token
pub fn token_endpoint(tenant_id: &str) -> String {
    format!("https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token")
}

/// Bearer token for the Graph API, replaced wholesale on each renewal.
#[derive(Debug, Clone, Default)]
pub struct BearerToken {
    pub value: String,
    pub obtained_at: Option<DateTime<Utc>>,
}

/// Shared handle over the current bearer token. Writers (the renewal loop)
/// take the lock exclusively, readers (the applications fetcher) shared;
/// both only copy the value in or out.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<BearerToken>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> BearerToken {
        self.inner.read().await.clone()
    }

    pub async fn write(&self, value: String) {
        let mut token = self.inner.write().await;
        token.value = value;
        token.obtained_at = Some(Utc::now());
    }

    pub async fn is_acquired(&self) -> bool {
        !self.inner.read().await.value.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct AuthTokenResponse {
    expires_in: u64,
    access_token: String,
}

/// Background loop renewing the Azure API token with the
/// `client_credentials` grant.
pub struct TokenUpdater {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    store: TokenStore,
}

impl TokenUpdater {
    pub fn new(
        client: Client,
        token_url: String,
        credentials: &CredentialsConfig,
        store: TokenStore,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.expose().to_string(),
            store,
        }
    }

    /// Exchange client credentials for a fresh token, store it, and return
    /// its validity duration. On failure the stored token is left untouched.
    pub async fn renew(&self) -> Result<Duration, AuthError> {
        debug!("calling with client id and secret: {}", self.token_url);

        let mut form = HashMap::new();
        form.insert("grant_type", "client_credentials");
        form.insert("scope", GRAPH_DEFAULT_SCOPE);
        form.insert("client_id", self.client_id.as_str());
        form.insert("client_secret", self.client_secret.as_str());

        let response = self.client.post(&self.token_url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::Status(response.status()));
        }

        let body: AuthTokenResponse = response.json().await?;
        self.store.write(body.access_token).await;

        Ok(Duration::from_secs(body.expires_in))
    }

    /// One renewal attempt. Returns the delay until the next attempt:
    /// 90% of the validity on success, the fixed backoff on failure.
    pub async fn run_cycle(&self) -> Duration {
        let metrics = get_metrics().await;
        let start = Instant::now();

        match self.renew().await {
            Ok(validity) => {
                let elapsed = start.elapsed();
                let next = renewal_delay(validity);
                metrics.token_update_duration.observe(elapsed.as_secs_f64());
                info!(
                    "updated azure api token in {:?}, next update after {:?}",
                    elapsed, next
                );
                next
            }
            Err(err) => {
                metrics.token_update_failures.inc();
                error!(
                    "failed updating api token -> {}, new attempt after {:?}",
                    err, RENEWAL_RETRY_BACKOFF
                );
                RENEWAL_RETRY_BACKOFF
            }
        }
    }

    pub async fn run(self) {
        loop {
            let delay = self.run_cycle().await;
            tokio::time::sleep(delay).await;
        }
    }
}

pub fn renewal_delay(validity: Duration) -> Duration {
    validity.mul_f64(RENEWAL_SAFETY_FACTOR)
}
