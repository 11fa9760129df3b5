//! Error types for the deploy pipeline

use thiserror::Error;

/// Cause of a transport-level stage failure.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or its response could not be read.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Terminal failure of a single deploy run.
///
/// Exactly one of these surfaces per invocation; no kind is retried
/// internally. Validation kinds guarantee that no network call was made.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A required request field was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The publish target was not one of the recognized values.
    #[error("Invalid publish target: {0}")]
    InvalidPublishTarget(String),

    /// The OAuth token endpoint could not be reached or rejected the exchange.
    #[error("Failed to fetch access token.")]
    TokenFetchFailed(#[source] TransportError),

    /// The token endpoint answered successfully without an access token.
    #[error("No access token received.")]
    NoAccessToken,

    /// The upload endpoint could not be reached or rejected the request.
    #[error("Failed to upload package.")]
    UploadFailed(#[source] TransportError),

    /// Upload was accepted but ingestion did not report `SUCCESS`.
    #[error("Upload state {0:?} !== \"SUCCESS\".")]
    InvalidUploadState(String),

    /// The publish endpoint could not be reached or rejected the request.
    #[error("Failed to publish package.")]
    PublishFailed(#[source] TransportError),

    /// Publish was accepted but the reported status did not start with `OK`.
    #[error("Publish status {0:?} !== \"OK\".")]
    InvalidPublishStatus(String),
}
