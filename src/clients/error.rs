use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to GitHub or a generative text provider.
///
/// Never surfaced as an HTTP error; the enrichment pipeline downgrades it
/// into an inline `error` marker.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} API responded with status: {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{0} returned an empty reply")]
    EmptyReply(&'static str),

    #[error("could not decode {service} response: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },

    #[error("generative text provider not configured")]
    NotConfigured,

    #[error("{0}")]
    InvalidInput(String),
}

impl UpstreamError {
    /// Read the body of a non-success response into a `Status` error.
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        UpstreamError::Status {
            service,
            status,
            body,
        }
    }
}
