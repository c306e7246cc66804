//! Wire-level clients for the supported provider families.
//!
//! Each backend performs exactly one HTTP exchange per call and reports the
//! raw outcome. Deadlines, cancellation, and failure classification are the
//! executor's job; nothing here retries or caches.

pub mod gemini;
pub mod huggingface;
pub mod ollama;

/// Text produced by a backend, with the output token count when reported
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub tokens: Option<u64>,
}

/// Raw backend outcome, prior to classification
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never completed (DNS, refused connection, broken stream)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The backend answered 2xx but the body was not usable
    #[error("unusable response body: {0}")]
    Malformed(String),
}

/// Read the error body of a failed response; an unreadable body degrades to
/// empty, keeping the status code available for classification
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}
