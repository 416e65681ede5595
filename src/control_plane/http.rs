//! HTTP Control Plane Client
//!
//! Issues subresource calls against the control plane's REST API:
//!
//! ```text
//! {server}/apis/subresources.kubevirt.io/v1/namespaces/{ns}/{resource}/{name}/{subresource}
//! ```
//!
//! Mutations are sent as `PUT` with a JSON body, queries as `GET`. Each
//! invocation is a single HTTP transaction; nothing is retried here.

use crate::command::request::MutationRequest;
use crate::config::ControlPlaneConfig;
use crate::control_plane::{ControlPlaneClient, ControlPlaneError};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// API group and version of the subresource endpoints
pub const SUBRESOURCE_API: &str = "apis/subresources.kubevirt.io/v1";

/// Control plane reached over HTTP(S)
pub struct HttpControlPlane {
    /// Reqwest HTTP client
    client: reqwest::Client,

    /// Base URL of the API server
    server: Url,

    namespace: String,

    /// Bearer token, if any
    token: Option<String>,

    timeout: Duration,
}

impl HttpControlPlane {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ControlPlaneError::Configuration`] if the server is not a
    /// usable base URL or the HTTP client cannot be built.
    pub fn new(config: &ControlPlaneConfig) -> Result<Self, ControlPlaneError> {
        let server = Url::parse(&config.server).map_err(|e| {
            ControlPlaneError::Configuration(format!("invalid server '{}': {}", config.server, e))
        })?;
        if server.cannot_be_a_base() {
            return Err(ControlPlaneError::Configuration(format!(
                "server '{}' cannot be used as a base URL",
                config.server
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ControlPlaneError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            server,
            namespace: config.namespace.clone(),
            token: config.token.clone(),
            timeout,
        })
    }

    /// URL of the subresource `request` is addressed to
    ///
    /// Every path segment is percent-encoded, so no name can escape its
    /// position in the path.
    pub fn endpoint(&self, request: &MutationRequest) -> Result<Url, ControlPlaneError> {
        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ControlPlaneError::Configuration(format!(
                    "server '{}' cannot be used as a base URL",
                    self.server
                ))
            })?
            .pop_if_empty()
            .extend(SUBRESOURCE_API.split('/'))
            .extend([
                "namespaces",
                self.namespace.as_str(),
                request.resource.plural(),
                request.target.as_str(),
                request.action.schema().subresource,
            ]);
        Ok(url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> ControlPlaneError {
        if err.is_timeout() {
            ControlPlaneError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ControlPlaneError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl ControlPlaneClient for HttpControlPlane {
    async fn invoke(&self, request: &MutationRequest) -> Result<Option<Value>, ControlPlaneError> {
        let url = self.endpoint(request)?;

        let mut builder = match request.payload() {
            Some(body) => {
                tracing::debug!(
                    "PUT {}: {}",
                    url,
                    serde_json::to_string(body).unwrap_or_default()
                );
                self.client.put(url).json(body)
            }
            None => {
                tracing::debug!("GET {}", url);
                self.client.get(url)
            }
        };
        builder = builder.header("Accept", "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ControlPlaneError::Unauthorized(format!("{} - {}", status, text)));
        }
        if !status.is_success() {
            return Err(ControlPlaneError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }

        if !request.is_query() || text.trim().is_empty() {
            return Ok(None);
        }
        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| ControlPlaneError::InvalidResponse(format!("{}: {}", e, text)))?;
        Ok(Some(payload))
    }
}
