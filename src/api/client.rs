// EditionGuard SDK - Rust client for the EditionGuard API
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP client for the EditionGuard API
//!
//! Every public operation on [`EditionGuardClient`] is exactly one HTTP
//! request. This module holds the shared pipeline they all go through:
//!
//! 1. Join the endpoint path segments onto the base URL
//! 2. Encode the merged query parameters
//! 3. Attach `Authorization: Token <token>` (read at send time)
//! 4. Attach the multipart body, if any
//! 5. Normalize the response into decoded JSON or a boolean outcome
//!
//! # Response Contracts
//! - JSON operations: 2xx bodies are decoded into `serde_json::Value` (an
//!   empty body decodes to `Value::Null`). Non-2xx responses become
//!   [`EditionGuardError::Status`], malformed bodies become
//!   [`EditionGuardError::Decode`].
//! - Boolean operations (deletes and deliveries): `Ok(true)` on 2xx,
//!   `Ok(false)` on any other status. Only transport failures are errors.
//!
//! There is no retry, backoff or rate limiting. Failures go straight back to
//! the caller.
//!
//! # Configuration
//! [`ClientConfig`] carries the API token, base URL, timeout and default DRM
//! type. It can be built explicitly with [`ClientConfig::builder`] or read
//! from the environment with [`ClientConfig::from_env`]:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `EDITIONGUARD_API_TOKEN` | API token (required) |
//! | `EDITIONGUARD_API_URL` | Base URL override |
//! | `EDITIONGUARD_TIMEOUT_SECS` | Request timeout in seconds |
//! | `EDITIONGUARD_DEFAULT_DRM` | Default DRM type code (1-4) |
//! | `EDITIONGUARD_ACCEPT_INVALID_CERTS` | `true` / `1` to skip TLS verification |

use crate::api::book::DrmType;
use crate::api::query::{self, Params};
use crate::error::{EditionGuardError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://app.editionguard.com/api/v2/";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "EDITIONGUARD_API_TOKEN";
/// Environment variable overriding the base URL
pub const ENV_API_URL: &str = "EDITIONGUARD_API_URL";
/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "EDITIONGUARD_TIMEOUT_SECS";
/// Environment variable overriding the default DRM type code
pub const ENV_DEFAULT_DRM: &str = "EDITIONGUARD_DEFAULT_DRM";
/// Environment variable disabling TLS certificate verification
pub const ENV_ACCEPT_INVALID_CERTS: &str = "EDITIONGUARD_ACCEPT_INVALID_CERTS";

/// Configuration for EditionGuardClient
#[derive(Clone)]
pub struct ClientConfig {
    pub api_token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// DRM type sent with book uploads unless the caller overrides `drm`
    pub default_drm: DrmType,
    /// Skip TLS certificate verification. Only meant for test environments.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("editionguard-rs/{}", env!("CARGO_PKG_VERSION")),
            default_drm: DrmType::default(),
            accept_invalid_certs: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("default_drm", &self.default_drm)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ClientConfig {
    /// Default configuration with the given token
    pub fn new<S: Into<String>>(api_token: S) -> Self {
        Self {
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Read configuration from the process environment
    ///
    /// # Errors
    /// Returns `Configuration` if the token is missing or any override is malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(ENV_API_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| EditionGuardError::configuration(format!("{} is not set", ENV_API_TOKEN)))?;

        let mut builder = ClientConfigBuilder::new().api_token(api_token);

        if let Some(url) = lookup(ENV_API_URL) {
            builder = builder.base_url(url);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                EditionGuardError::configuration(format!("{} must be a number of seconds: {}", ENV_TIMEOUT_SECS, e))
            })?;
            if secs == 0 {
                return Err(EditionGuardError::configuration(format!(
                    "{} must be greater than zero",
                    ENV_TIMEOUT_SECS
                )));
            }
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(code) = lookup(ENV_DEFAULT_DRM) {
            let drm = code
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|code| DrmType::try_from(code).ok())
                .ok_or_else(|| {
                    EditionGuardError::configuration(format!("{} must be a DRM type code 1-4, got '{}'", ENV_DEFAULT_DRM, code))
                })?;
            builder = builder.default_drm(drm);
        }

        if let Some(flag) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            let accept = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "" | "0" | "false" | "no" => false,
                other => {
                    return Err(EditionGuardError::configuration(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_ACCEPT_INVALID_CERTS, other
                    )))
                }
            };
            builder = builder.accept_invalid_certs(accept);
        }

        Ok(builder.build())
    }
}

/// Builder for ClientConfig
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn api_token<S: Into<String>>(mut self, api_token: S) -> Self {
        self.config.api_token = api_token.into();
        self
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn default_drm(mut self, drm: DrmType) -> Self {
        self.config.default_drm = drm;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Client for the EditionGuard REST API
///
/// Holds an immutable configuration, a pooled `reqwest::Client` and the API
/// token. Cloning is cheap and clones share the token, so one instance built
/// at startup can be handed to every caller that needs it.
///
/// # Example
/// ```rust,no_run
/// use editionguard::api::{EditionGuardClient, Params};
///
/// # async fn example() -> editionguard::error::Result<()> {
/// let client = EditionGuardClient::new("my-api-token")?;
///
/// let books = client.get_books(&Params::new()).await?;
/// let removed = client.delete_book(42).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EditionGuardClient {
    /// Underlying HTTP client
    client: Client,
    /// Current API token, replaceable at runtime
    api_token: Arc<RwLock<String>>,
    /// API base URL, always ending in `/`
    base_url: Url,
    config: ClientConfig,
}

impl fmt::Debug for EditionGuardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditionGuardClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EditionGuardClient {
    /// Create a client with default configuration and the given token
    pub fn new<S: Into<String>>(api_token: S) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_token))
    }

    /// Create a client from environment configuration
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Returns error if:
    /// - The base URL cannot be parsed or cannot hold a path
    /// - The user agent is not a valid header value
    /// - The HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| EditionGuardError::invalid_input(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for the EditionGuard client");
        }

        Ok(Self {
            client,
            api_token: Arc::new(RwLock::new(config.api_token.clone())),
            base_url,
            config,
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Get the configuration the client was built with
    ///
    /// `api_token` here is the token given at construction; see
    /// [`api_token`](Self::api_token) for the current one.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// DRM type sent with book uploads when the caller does not pass `drm`
    pub fn default_drm(&self) -> DrmType {
        self.config.default_drm
    }

    /// Current API token
    pub async fn api_token(&self) -> String {
        self.api_token.read().await.clone()
    }

    /// Replace the API token
    ///
    /// Takes effect from the next request on, for this client and all its clones.
    pub async fn set_api_token<S: Into<String>>(&self, api_token: S) {
        *self.api_token.write().await = api_token.into();
    }

    /// Resolve endpoint path segments against the base URL
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/` or
    /// `?` stay a single segment.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EditionGuardError::configuration(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and decode the JSON response body
    pub(crate) async fn request_json<T>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Params,
        form: Option<Form>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let endpoint = segments.join("/");
        let response = self.send(method, segments, query, form).await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response, &endpoint).await);
        }

        let body = response.text().await?;
        decode_body(body)
    }

    /// Send one request and report whether it succeeded (2xx)
    pub(crate) async fn request_status(&self, method: Method, segments: &[&str], query: &Params) -> Result<bool> {
        let response = self.send(method, segments, query, None).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(
                endpoint = %segments.join("/"),
                status = status.as_u16(),
                "EditionGuard request was not successful"
            );
        }

        Ok(status.is_success())
    }

    async fn send(&self, method: Method, segments: &[&str], query: &Params, form: Option<Form>) -> Result<Response> {
        let mut url = self.endpoint_url(segments)?;
        let encoded = query::encode(query);
        url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));

        tracing::debug!(method = %method, endpoint = %segments.join("/"), "Sending EditionGuard request");

        let mut request = self
            .client
            .request(method, url)
            .headers(self.build_auth_headers().await?);

        if let Some(form) = form {
            request = request.multipart(form);
        }

        let response = request.send().await?;
        tracing::debug!(status = response.status().as_u16(), "Received EditionGuard response");

        Ok(response)
    }

    /// Build the `Authorization: Token <token>` header from the current token
    async fn build_auth_headers(&self) -> Result<HeaderMap> {
        let token = self.api_token.read().await;
        let mut value = HeaderValue::from_str(&format!("Token {}", token))
            .map_err(|e| EditionGuardError::invalid_input(format!("Invalid API token: {}", e)))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Turn a non-2xx response into a Status error
    async fn handle_error_response(&self, response: Response, endpoint: &str) -> EditionGuardError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "EditionGuard request failed");

        EditionGuardError::status_failed(status.as_u16(), endpoint, body)
    }
}

/// Decode a response body, treating an empty body as JSON `null`
fn decode_body<T: DeserializeOwned>(body: String) -> Result<T> {
    let text = if body.trim().is_empty() { "null" } else { body.as_str() };

    serde_json::from_str::<T>(text).map_err(|source| EditionGuardError::Decode {
        message: format!(
            "Parse error: {} at line {} col {}",
            source,
            source.line(),
            source.column()
        ),
        body,
        source,
    })
}

/// Parse the base URL, making sure it ends in `/`
fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&normalized)
        .map_err(|e| EditionGuardError::configuration(format!("Invalid base URL '{}': {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(EditionGuardError::configuration(format!(
            "Base URL cannot hold a path: {}",
            base_url
        )));
    }

    Ok(url)
}

// ===== TESTS =====
