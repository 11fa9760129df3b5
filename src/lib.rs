//! Chrome Web Store deploy pipeline.
//!
//! Publishes a browser-extension package on behalf of a developer account in
//! one sequential, fail-fast run: exchange OAuth credentials for an access
//! token, upload the zip archive, then trigger publication to the chosen
//! audience. Each remote endpoint is called at most once per run and the
//! first failure aborts the rest.
//!
//! ```no_run
//! use chrome_webstore_deploy::{deploy, DeployRequest, PublishTarget};
//!
//! # async fn run(zip: Vec<u8>) -> Result<(), chrome_webstore_deploy::DeployError> {
//! let request = DeployRequest::new(
//!     "client-id",
//!     "client-secret",
//!     "refresh-token",
//!     "extension-id",
//!     zip,
//! )
//! .publish_target(PublishTarget::TrustedTesters);
//!
//! deploy(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod errors;
pub mod request;

pub use client::WebstoreClient;
pub use errors::{DeployError, TransportError};
pub use request::{DeployRequest, PublishTarget};

/// Deploy with a default client against the production Google endpoints.
///
/// Convenience wrapper over [`WebstoreClient::deploy`]. A failure to set up
/// the transport surfaces as the first stage that needed it.
pub async fn deploy(request: &DeployRequest) -> Result<(), DeployError> {
    request.validate()?;

    let client = WebstoreClient::new()
        .map_err(|err| DeployError::TokenFetchFailed(err.into()))?;
    client.deploy(request).await
}
