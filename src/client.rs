//! Web Store API client and the deploy pipeline

use std::time::Duration;

use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{DeployError, TransportError};
use crate::request::{DeployRequest, PublishTarget};

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";

/// Default Web Store API root.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// API version header required by the Web Store endpoints.
const API_VERSION_HEADER: &str = "x-goog-api-version";

/// Client for the Web Store deploy pipeline.
pub struct WebstoreClient {
    client: Client,
    token_url: String,
    api_base: String,
}

impl WebstoreClient {
    /// Create a client for the production Google endpoints.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_endpoints(DEFAULT_TOKEN_URL, DEFAULT_API_BASE)
    }

    /// Create a client pointed at alternate endpoint roots.
    pub fn with_endpoints(token_url: &str, api_base: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self::with_http_client(client, token_url, api_base))
    }

    /// Create a client from a caller-configured transport.
    ///
    /// Timeouts, proxies, and cancellation all live on the supplied
    /// `reqwest::Client`; the pipeline itself adds none.
    pub fn with_http_client(client: Client, token_url: &str, api_base: &str) -> Self {
        Self {
            client,
            token_url: token_url.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Run the deploy pipeline for one request.
    ///
    /// Stages run strictly in order: validate, fetch access token, upload
    /// package, publish. The first failure aborts the run, so each remote
    /// endpoint is called at most once per invocation.
    pub async fn deploy(&self, request: &DeployRequest) -> Result<(), DeployError> {
        request.validate()?;

        let access_token = self.fetch_access_token(request).await?;
        self.upload_package(request, &access_token).await?;
        self.publish_package(request, &access_token).await?;

        info!(
            extension_id = %request.extension_id,
            target = %request.publish_target,
            "extension published"
        );
        Ok(())
    }

    /// Exchange the refresh token for a short-lived access token.
    async fn fetch_access_token(
        &self,
        request: &DeployRequest,
    ) -> Result<SecretString, DeployError> {
        debug!("POST {}", self.token_url);

        let form = [
            ("client_id", request.client_id.as_str()),
            ("client_secret", request.client_secret.expose_secret()),
            ("refresh_token", request.refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
            ("redirect_uri", "urn:ietf:wg:oauth:2.0:oob"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| DeployError::TokenFetchFailed(err.into()))?;
        let response = check_status(response)
            .await
            .map_err(DeployError::TokenFetchFailed)?;

        #[derive(Deserialize)]
        struct TokenResponse {
            #[serde(default)]
            access_token: Option<String>,
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|err| DeployError::TokenFetchFailed(err.into()))?;

        match body.access_token {
            Some(token) if !token.is_empty() => {
                debug!("access token acquired");
                Ok(SecretString::from(token))
            }
            _ => Err(DeployError::NoAccessToken),
        }
    }

    /// Upload the package archive for the target extension.
    async fn upload_package(
        &self,
        request: &DeployRequest,
        access_token: &SecretString,
    ) -> Result<(), DeployError> {
        let url = format!(
            "{}/upload/chromewebstore/v1.1/items/{}",
            self.api_base, request.extension_id
        );
        debug!("PUT {} ({} bytes)", url, request.package_data.len());

        let response = self
            .client
            .put(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .header(API_VERSION_HEADER, "2")
            .header(header::CONTENT_TYPE, "application/zip")
            .body(request.package_data.clone())
            .send()
            .await
            .map_err(|err| DeployError::UploadFailed(err.into()))?;
        let response = check_status(response)
            .await
            .map_err(DeployError::UploadFailed)?;

        #[derive(Deserialize)]
        struct UploadResponse {
            #[serde(rename = "uploadState", default)]
            upload_state: Option<String>,
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| DeployError::UploadFailed(err.into()))?;

        let state = body.upload_state.unwrap_or_default();
        if state != "SUCCESS" {
            return Err(DeployError::InvalidUploadState(state));
        }

        info!(extension_id = %request.extension_id, "package uploaded");
        Ok(())
    }

    /// Trigger publication of the uploaded package to the chosen audience.
    async fn publish_package(
        &self,
        request: &DeployRequest,
        access_token: &SecretString,
    ) -> Result<(), DeployError> {
        let url = format!(
            "{}/chromewebstore/v1.1/items/{}/publish",
            self.api_base, request.extension_id
        );
        debug!("POST {} (target: {})", url, request.publish_target);

        let builder = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, bearer(access_token))
            .header(API_VERSION_HEADER, "2");

        let builder = match request.publish_target {
            PublishTarget::Public => builder.header(header::CONTENT_LENGTH, 0),
            PublishTarget::TrustedTesters => builder.json(&serde_json::json!({
                "publish_to_trusted_testers": true,
                "target": "trustedTesters",
            })),
        };

        let response = builder
            .send()
            .await
            .map_err(|err| DeployError::PublishFailed(err.into()))?;
        let response = check_status(response)
            .await
            .map_err(DeployError::PublishFailed)?;

        #[derive(Deserialize)]
        struct PublishResponse {
            #[serde(default)]
            status: Vec<String>,
        }

        let body: PublishResponse = response
            .json()
            .await
            .map_err(|err| DeployError::PublishFailed(err.into()))?;

        let status = body.status.into_iter().next().unwrap_or_default();
        if status != "OK" {
            return Err(DeployError::InvalidPublishStatus(status));
        }
        Ok(())
    }
}

/// Turn a non-2xx response into a transport error carrying status and body.
async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status { status, body })
}

fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}
