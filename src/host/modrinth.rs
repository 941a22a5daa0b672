//! host::modrinth
//!
//! Modrinth host implementation using the v2 REST API.
//!
//! # Design
//!
//! This module implements the `ModHost` trait against the Modrinth API. One
//! `reqwest::Client` is shared across calls with a uniform connect + read
//! timeout, so no single lookup or upload can block indefinitely. No call is
//! retried automatically: identifiers and files are not safely re-resolved
//! mid-build.
//!
//! # Response classification
//!
//! - 2xx with the expected JSON shape → success
//! - 404 on a lookup → `HostError::IdentifierNotFound`
//! - any other status with a well-formed `{error, description}` body →
//!   `HostError::ApiRejected`
//! - a body that fails to parse as the expected shape →
//!   `HostError::ProtocolViolation`
//! - network-level failure → `HostError::Transport`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::traits::{
    CreatedVersion, ErrorBody, HostError, ModHost, ProjectInfo, UploadFile, VersionData,
    VersionFilter, VersionInfo,
};

/// Default production API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.modrinth.com/v2";

/// Staging API base URL, for testing uploads without touching production.
pub const STAGING_API_BASE: &str = "https://staging-api.modrinth.com/v2";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("modpub/", env!("CARGO_PKG_VERSION"));

/// Uniform read timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Uniform connect timeout applied to every call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Modrinth host implementation.
pub struct ModrinthHost {
    /// Shared HTTP client with the uniform timeout policy.
    client: Client,
    /// API token sent in the `Authorization` header.
    token: String,
    /// API base URL (configurable for staging).
    api_base: String,
}

// Custom Debug to avoid exposing the token.
impl std::fmt::Debug for ModrinthHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModrinthHost")
            .field("api_base", &self.api_base)
            .field("has_token", &!self.token.is_empty())
            .finish()
    }
}

impl ModrinthHost {
    /// Create a host against the production API.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Transport` if the HTTP client cannot be built
    /// (TLS backend initialization failure).
    pub fn new(token: impl Into<String>) -> Result<Self, HostError> {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a host against a custom API base URL (staging, tests).
    pub fn with_api_base(
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, HostError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.into(),
        })
    }

    /// The configured API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build a URL for an API path, tolerating a trailing slash on the base.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Parse a success body, mapping parse failures to `ProtocolViolation`.
    async fn parse_success<T: DeserializeOwned>(response: Response) -> Result<T, HostError> {
        let body = response
            .text()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            HostError::ProtocolViolation(format!(
                "unexpected response shape: {} (body: {})",
                e,
                snippet(&body)
            ))
        })
    }

    /// Classify a non-success response.
    ///
    /// A parseable `{error, description}` body is a declared API error; an
    /// unparseable body is a protocol violation in its own right.
    async fn classify_error(response: Response) -> HostError {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return HostError::Transport(e.to_string()),
        };

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => HostError::ApiRejected {
                status: status.as_u16(),
                error: err.error,
                description: err.description,
            },
            Err(_) => HostError::ProtocolViolation(format!(
                "status {} with unparseable error body: {}",
                status.as_u16(),
                snippet(&body)
            )),
        }
    }

    /// Handle a lookup response where 404 means the reference is unknown.
    async fn handle_lookup<T: DeserializeOwned>(
        response: Response,
        reference: &str,
    ) -> Result<T, HostError> {
        let status = response.status();
        if status.is_success() {
            Self::parse_success(response).await
        } else if status == StatusCode::NOT_FOUND {
            Err(HostError::IdentifierNotFound(reference.to_string()))
        } else {
            Err(Self::classify_error(response).await)
        }
    }
}

#[async_trait]
impl ModHost for ModrinthHost {
    fn name(&self) -> &'static str {
        "modrinth"
    }

    async fn get_project(&self, reference: &str) -> Result<ProjectInfo, HostError> {
        let response = self
            .client
            .get(self.url(&format!("project/{}", reference)))
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Self::handle_lookup(response, reference).await
    }

    async fn get_version(&self, id: &str) -> Result<VersionInfo, HostError> {
        let response = self
            .client
            .get(self.url(&format!("version/{}", id)))
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Self::handle_lookup(response, id).await
    }

    async fn list_versions(
        &self,
        project_id: &str,
        filter: &VersionFilter,
    ) -> Result<Vec<VersionInfo>, HostError> {
        // Filter values are JSON-array-encoded query parameters, e.g.
        // loaders=["fabric"].
        let mut query: Vec<(&str, String)> = Vec::new();
        if !filter.loaders.is_empty() {
            let value = serde_json::to_string(&filter.loaders)
                .map_err(|e| HostError::ProtocolViolation(e.to_string()))?;
            query.push(("loaders", value));
        }
        if !filter.game_versions.is_empty() {
            let value = serde_json::to_string(&filter.game_versions)
                .map_err(|e| HostError::ProtocolViolation(e.to_string()))?;
            query.push(("game_versions", value));
        }

        let response = self
            .client
            .get(self.url(&format!("project/{}/version", project_id)))
            .query(&query)
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Self::handle_lookup(response, project_id).await
    }

    async fn create_version(
        &self,
        data: &VersionData,
        files: Vec<UploadFile>,
    ) -> Result<CreatedVersion, HostError> {
        let json = serde_json::to_string(data)
            .map_err(|e| HostError::ProtocolViolation(format!("failed to serialize body: {}", e)))?;

        let data_part = Part::text(json)
            .mime_str("application/json")
            .map_err(|e| HostError::ProtocolViolation(e.to_string()))?;

        let mut form = Form::new().part("data", data_part);
        // Attachment order follows the part keys assigned by the request
        // builder; index "0" is always the primary artifact.
        for file in files {
            form = form.part(file.part_key, Part::bytes(file.bytes).file_name(file.file_name));
        }

        let response = self
            .client
            .post(self.url("version"))
            .header("Authorization", &self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Self::parse_success(response).await
        } else {
            Err(Self::classify_error(response).await)
        }
    }

    async fn update_project_body(&self, project_id: &str, body: &str) -> Result<(), HostError> {
        let response = self
            .client
            .patch(self.url(&format!("project/{}", project_id)))
            .header("Authorization", &self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(HostError::IdentifierNotFound(project_id.to_string()))
        } else {
            Err(Self::classify_error(response).await)
        }
    }
}

/// Truncate a body for inclusion in an error message.
fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let host = ModrinthHost::with_api_base("token", "https://example.test/v2/").unwrap();
        assert_eq!(
            host.url("project/my-mod"),
            "https://example.test/v2/project/my-mod"
        );

        let host = ModrinthHost::with_api_base("token", "https://example.test/v2").unwrap();
        assert_eq!(host.url("version"), "https://example.test/v2/version");
    }

    #[test]
    fn debug_redacts_token() {
        let host = ModrinthHost::new("secret_token_abc").unwrap();
        let rendered = format!("{:?}", host);
        assert!(!rendered.contains("secret_token_abc"));
        assert!(rendered.contains("has_token"));
    }

    #[test]
    fn default_base_is_production() {
        let host = ModrinthHost::new("token").unwrap();
        assert_eq!(host.api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert!(s.len() < 500);
        assert!(s.ends_with("..."));
        assert_eq!(snippet("short"), "short");
    }
}
