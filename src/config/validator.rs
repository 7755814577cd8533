use anyhow::{bail, Result};

use crate::ServiceConfig;

/// Startup-time validation. A failure here aborts the process before any
/// background loop is spawned; the loops assume these invariants hold.
pub fn validate_service_config(config: &ServiceConfig) -> Result<()> {
    verify_credential_present("tenant_id", &config.credentials.tenant_id)?;
    verify_credential_present("client_id", &config.credentials.client_id)?;
    verify_credential_present("client_secret", config.credentials.client_secret.expose())?;

    let applications = &config.applications;
    if applications.results_per_page < 1 || applications.results_per_page > 999 {
        bail!(
            "applications.results_per_page {} not in range 1..=999",
            applications.results_per_page
        );
    }
    if applications.cache_refresh_interval_seconds == 0 {
        bail!("applications.cache_refresh_interval_seconds must be positive");
    }
    if applications.url.is_empty() {
        bail!("applications.url cannot be empty");
    }

    let metrics = &config.settings.metrics;
    if !metrics.path.starts_with('/') {
        bail!("metrics path '{}' must start with '/'", metrics.path);
    }

    Ok(())
}

fn verify_credential_present(name: &str, credential: &str) -> Result<()> {
    // "..." is the placeholder shipped in the example settings file
    if credential.is_empty() || credential == "..." {
        bail!("empty credential found in settings: {}", name);
    }
    Ok(())
}
