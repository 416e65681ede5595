//! Control Plane Client
//!
//! The executor talks to the orchestration backend only through the
//! [`ControlPlaneClient`] trait, so the HTTP implementation can be swapped
//! for a test double. Connection handling, authentication and any retry
//! policy belong to the implementation, not to the caller.

pub mod http;

pub use http::HttpControlPlane;

use crate::command::request::MutationRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Error types reported by a control plane
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlPlaneError {
    /// Could not reach the control plane
    #[error("Connection error: {0}")]
    Connection(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Credentials missing or insufficient
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The control plane refused the request
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The client itself is misconfigured
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

/// Capability to invoke an action on the control plane
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Send `request` and wait for a definitive answer
    ///
    /// Returns the response payload for query actions that produce one.
    async fn invoke(&self, request: &MutationRequest) -> Result<Option<Value>, ControlPlaneError>;
}

#[async_trait]
impl<T: ControlPlaneClient + ?Sized> ControlPlaneClient for std::sync::Arc<T> {
    async fn invoke(&self, request: &MutationRequest) -> Result<Option<Value>, ControlPlaneError> {
        (**self).invoke(request).await
    }
}
