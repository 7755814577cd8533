use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub applications: ApplicationsConfig,
    pub settings: SettingsConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CredentialsConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: ClientSecret,
}

/// Client secret wrapper. Serialization and debug output are masked so the
/// secret never leaks through the settings endpoint or logs.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Serialize for ClientSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("******")
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("******")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApplicationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_refresh_interval_seconds")]
    pub cache_refresh_interval_seconds: u64,
    #[serde(default = "default_applications_url")]
    pub url: String,
    /// Graph API caps $top at 999
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u16,
}

impl ApplicationsConfig {
    pub fn cache_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.cache_refresh_interval_seconds)
    }
}

impl Default for ApplicationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_refresh_interval_seconds: default_cache_refresh_interval_seconds(),
            url: default_applications_url(),
            results_per_page: default_results_per_page(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SettingsConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct DebugConfig {
    #[serde(default)]
    pub no_verify_tls: bool,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_cache_refresh_interval_seconds() -> u64 {
    900
}

fn default_applications_url() -> String {
    "https://graph.microsoft.com/v1.0/applications".to_string()
}

fn default_results_per_page() -> u16 {
    999
}
