use reqwest::StatusCode;

/// Errors surfaced by the quiz API collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
