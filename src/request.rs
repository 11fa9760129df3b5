//! Deploy request configuration and validation

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DeployError;

/// Audience a publish run targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishTarget {
    /// General public listing.
    #[default]
    Public,

    /// Pre-approved tester list only.
    TrustedTesters,
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishTarget::Public => f.write_str("PUBLIC"),
            PublishTarget::TrustedTesters => f.write_str("TRUSTED_TESTERS"),
        }
    }
}

impl FromStr for PublishTarget {
    type Err = DeployError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PUBLIC" => Ok(PublishTarget::Public),
            "TRUSTED_TESTERS" => Ok(PublishTarget::TrustedTesters),
            other => Err(DeployError::InvalidPublishTarget(other.to_string())),
        }
    }
}

/// Configuration for one deploy run.
///
/// All fields except `publish_target` are required and must be non-empty.
/// The request is read-only for the duration of the run.
pub struct DeployRequest {
    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: SecretString,

    /// Long-lived OAuth refresh token.
    pub refresh_token: SecretString,

    /// Web Store item identifier of the extension being updated.
    pub extension_id: String,

    /// Raw bytes of the zip archive to upload.
    pub package_data: Vec<u8>,

    /// Publish audience. Defaults to [`PublishTarget::Public`].
    pub publish_target: PublishTarget,
}

impl DeployRequest {
    /// Create a request targeting the default public audience.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        extension_id: impl Into<String>,
        package_data: Vec<u8>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            refresh_token: SecretString::from(refresh_token.into()),
            extension_id: extension_id.into(),
            package_data,
            publish_target: PublishTarget::default(),
        }
    }

    /// Set the publish audience.
    pub fn publish_target(mut self, target: PublishTarget) -> Self {
        self.publish_target = target;
        self
    }

    /// Check required fields in a fixed order, failing on the first empty one.
    ///
    /// Performs no I/O.
    pub(crate) fn validate(&self) -> Result<(), DeployError> {
        if self.client_id.is_empty() {
            return Err(DeployError::MissingField("client_id"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(DeployError::MissingField("client_secret"));
        }
        if self.refresh_token.expose_secret().is_empty() {
            return Err(DeployError::MissingField("refresh_token"));
        }
        if self.extension_id.is_empty() {
            return Err(DeployError::MissingField("extension_id"));
        }
        if self.package_data.is_empty() {
            return Err(DeployError::MissingField("package_data"));
        }
        Ok(())
    }
}

impl fmt::Debug for DeployRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("refresh_token", &self.refresh_token)
            .field("extension_id", &self.extension_id)
            .field("package_data", &format_args!("{} bytes", self.package_data.len()))
            .field("publish_target", &self.publish_target)
            .finish()
    }
}
