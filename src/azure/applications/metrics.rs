use chrono::SecondsFormat;

use crate::azure::applications::cache::ApplicationCache;
use crate::observability::metrics::get_metrics;

/// Republish one remaining-seconds gauge per cached password credential.
/// Invoked on every metrics scrape; repeated runs simply overwrite the
/// previous values.
pub async fn update_applications_metrics(cache: &ApplicationCache) {
    let metrics = get_metrics().await;

    for (id, application) in cache.snapshot().await {
        for password in &application.password_credentials {
            let end_date_time = password
                .end_date_time
                .map(|end| end.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();

            metrics
                .password_remaining_seconds
                .with_label_values(&[
                    id.as_str(),
                    application.app_id.as_str(),
                    application.display_name.as_deref().unwrap_or(""),
                    password.key_id.as_str(),
                    password.display_name.as_deref().unwrap_or(""),
                    end_date_time.as_str(),
                ])
                .set(password.remaining_seconds());
        }
    }
}
