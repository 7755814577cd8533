use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::azure::applications::cache::ApplicationCache;
use crate::azure::applications::types::ApplicationsPage;
use crate::azure::token::TokenStore;
use crate::config::settings::ApplicationsConfig;
use crate::error::FetchError;
use crate::observability::metrics::get_metrics;

/// Poll interval while waiting for the token loop to produce a first token.
const TOKEN_WAIT_INTERVAL: Duration = Duration::from_secs(5);

/// https://learn.microsoft.com/en-us/graph/query-parameters
const SELECT_FIELDS: &str = "id,appId,displayName,createdDateTime,passwordCredentials";

/// Background loop rebuilding the application cache from the paginated
/// Graph listing. A cycle either replaces the cache wholesale or, on the
/// first failed page, leaves it untouched.
pub struct ApplicationsUpdater {
    client: Client,
    url: String,
    results_per_page: u16,
    refresh_interval: Duration,
    token: TokenStore,
    cache: ApplicationCache,
}

impl ApplicationsUpdater {
    pub fn new(
        client: Client,
        config: &ApplicationsConfig,
        token: TokenStore,
        cache: ApplicationCache,
    ) -> Self {
        Self {
            client,
            url: config.url.clone(),
            results_per_page: config.results_per_page,
            refresh_interval: config.cache_refresh_interval(),
            token,
            cache,
        }
    }

    fn first_page_url(&self) -> String {
        format!(
            "{}?$top={}&$select={}",
            self.url, self.results_per_page, SELECT_FIELDS
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<ApplicationsPage, FetchError> {
        debug!("calling with bearer token: {url}");

        let token = self.token.read().await;
        let response = self
            .client
            .get(url)
            .bearer_auth(&token.value)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch every page and swap the accumulated result into the cache.
    /// Returns the number of cached applications.
    pub async fn refresh(&self) -> Result<usize, FetchError> {
        let mut page = self.fetch_page(&self.first_page_url()).await?;
        let mut applications = std::mem::take(&mut page.value);

        while let Some(next_link) = page.next_link {
            page = self.fetch_page(&next_link).await?;
            applications.append(&mut page.value);
        }

        let cached = self.cache.replace_all(applications).await;
        debug!("cached {cached} applications");

        Ok(cached)
    }

    /// The token loop starts simultaneously with this one, so block until
    /// it has acquired a first token. One-time startup barrier only.
    pub async fn wait_for_token(&self) {
        while !self.token.is_acquired().await {
            warn!(
                "azure api token not yet acquired, sleeping {:?}",
                TOKEN_WAIT_INTERVAL
            );
            tokio::time::sleep(TOKEN_WAIT_INTERVAL).await;
        }
    }

    /// One refresh attempt with its metrics and logging. Success and
    /// failure share the same refresh interval.
    pub async fn run_cycle(&self) {
        let metrics = get_metrics().await;
        let start = Instant::now();

        match self.refresh().await {
            Ok(cached) => {
                let elapsed = start.elapsed();
                metrics
                    .applications_update_duration
                    .observe(elapsed.as_secs_f64());
                info!(
                    "updated {} azure applications in {:?}, next update after {:?}",
                    cached, elapsed, self.refresh_interval
                );
            }
            Err(err) => {
                metrics.applications_update_failures.inc();
                error!(
                    "failed updating azure applications -> {}, new attempt after {:?}",
                    err, self.refresh_interval
                );
            }
        }
    }

    pub async fn run(self) {
        self.wait_for_token().await;
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.refresh_interval).await;
        }
    }
}
