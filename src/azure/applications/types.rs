use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of the Graph applications listing.
/// https://learn.microsoft.com/en-us/graph/api/application-list?view=graph-rest-1.0
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationsPage {
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    pub value: Vec<AzureApplication>,
}

/// https://learn.microsoft.com/en-us/graph/api/resources/application?view=graph-rest-1.0#properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureApplication {
    pub id: String,
    pub app_id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub password_credentials: Vec<PasswordCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCredential {
    pub key_id: String,
    pub display_name: Option<String>,
    pub end_date_time: Option<DateTime<Utc>>,
}

impl PasswordCredential {
    /// Seconds until the credential expires, negative once it has.
    /// A credential without an end time never expires.
    pub fn remaining_seconds(&self) -> f64 {
        match self.end_date_time {
            Some(end) => (end - Utc::now()).num_milliseconds() as f64 / 1000.0,
            None => f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn credential(end_date_time: Option<DateTime<Utc>>) -> PasswordCredential {
        PasswordCredential {
            key_id: "k".to_string(),
            display_name: None,
            end_date_time,
        }
    }

    #[test]
    fn remaining_seconds_without_end_date_is_infinite() {
        assert_eq!(credential(None).remaining_seconds(), f64::INFINITY);
    }

    #[test]
    fn remaining_seconds_before_expiry_is_positive() {
        let remaining =
            credential(Some(Utc::now() + TimeDelta::seconds(3600))).remaining_seconds();
        assert!((remaining - 3600.0).abs() < 5.0, "got {remaining}");
    }

    #[test]
    fn remaining_seconds_after_expiry_is_negative_not_clamped() {
        let remaining =
            credential(Some(Utc::now() - TimeDelta::seconds(3600))).remaining_seconds();
        assert!((remaining + 3600.0).abs() < 5.0, "got {remaining}");
    }

    #[test]
    fn page_parses_odata_next_link() {
        let page: ApplicationsPage = serde_json::from_str(
            r#"{
                "@odata.nextLink": "https://graph.microsoft.com/v1.0/applications?$skiptoken=abc",
                "value": [{
                    "id": "obj-1",
                    "appId": "app-1",
                    "displayName": "demo",
                    "passwordCredentials": [{
                        "keyId": "key-1",
                        "displayName": null,
                        "endDateTime": "2030-01-01T00:00:00Z"
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert!(page.next_link.as_deref().unwrap().contains("skiptoken"));
        assert_eq!(page.value.len(), 1);
        assert_eq!(page.value[0].app_id, "app-1");
        assert_eq!(page.value[0].password_credentials[0].key_id, "key-1");
    }
}
