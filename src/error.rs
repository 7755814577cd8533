use reqwest::StatusCode;

/// Failure renewing the Azure API token. The previous token stays usable.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token endpoint returned status {0}")]
    Status(StatusCode),
}

/// Failure of a single applications refresh cycle. The cache keeps its
/// last-known-good contents.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("applications request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("applications endpoint returned status {status} for {url}")]
    Status { status: StatusCode, url: String },
}
