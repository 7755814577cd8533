#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use crate::config::loader;

    const MINIMAL_SETTINGS: &str = r#"
credentials:
  tenant_id: tenant-123
  client_id: client-123
  client_secret: hunter2
settings:
  server:
    host: 127.0.0.1
    port: "9081"
"#;

    async fn load(yaml: &str) -> anyhow::Result<crate::ServiceConfig> {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(yaml.as_bytes()).expect("write settings");
        loader::run(file.path().to_str().unwrap()).await
    }

    #[tokio::test]
    async fn minimal_settings_get_defaults() {
        let config = load(MINIMAL_SETTINGS).await.expect("load failed");

        assert!(config.applications.enabled);
        assert_eq!(config.applications.cache_refresh_interval_seconds, 900);
        assert_eq!(config.applications.results_per_page, 999);
        assert_eq!(
            config.applications.url,
            "https://graph.microsoft.com/v1.0/applications"
        );
        assert_eq!(config.settings.metrics.path, "/metrics");
        assert!(config.settings.metrics.is_enabled);
        assert!(!config.debug.no_verify_tls);
    }

    #[tokio::test]
    #[serial]
    async fn env_placeholders_are_expanded() {
        std::env::set_var("TEST_AZURE_CLIENT_SECRET", "from-env");
        let yaml = MINIMAL_SETTINGS.replace("hunter2", "${TEST_AZURE_CLIENT_SECRET}");

        let config = load(&yaml).await.expect("load failed");

        assert_eq!(config.credentials.client_secret.expose(), "from-env");
        std::env::remove_var("TEST_AZURE_CLIENT_SECRET");
    }

    #[tokio::test]
    async fn rejects_out_of_range_results_per_page() {
        let yaml = format!(
            "{MINIMAL_SETTINGS}applications:\n  results_per_page: 0\n"
        );
        assert!(load(&yaml).await.is_err());
    }

    #[tokio::test]
    async fn rejects_placeholder_credentials() {
        let yaml = MINIMAL_SETTINGS.replace("tenant-123", "...");
        assert!(load(&yaml).await.is_err());
    }

    #[tokio::test]
    async fn rejects_zero_refresh_interval() {
        let yaml = format!(
            "{MINIMAL_SETTINGS}applications:\n  cache_refresh_interval_seconds: 0\n"
        );
        assert!(load(&yaml).await.is_err());
    }
}
