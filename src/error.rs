use thiserror::Error;

/// Failure taxonomy for the recommendation pipeline.
///
/// Catalog search failures propagate to the caller; the ranker and the
/// question planner recover from every variant internally and degrade to
/// their deterministic fallbacks instead.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The catalog or model endpoint answered with a non-success status.
    #[error("upstream request failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A model reply did not contain the expected content or JSON shape.
    #[error("could not parse expected content from response: {0}")]
    Parse(String),

    /// User input rejected before any network call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Connection-level failure from the HTTP transport.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;
