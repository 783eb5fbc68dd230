pub mod http;
pub mod inmemory;

use async_trait::async_trait;
use thiserror::Error;

use super::graphql::{GraphQLRequest, GraphQLResponse};
use crate::session::SessionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        error_type: Option<String>,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session failure: {0}")]
    Session(#[from] SessionError),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Serialization failure: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

/// Transport for the notification service's GraphQL API.
///
/// Implementations must tolerate concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphQLGateway: Send + Sync {
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse, GatewayError>;

    /// Drops anything the transport keeps between requests.
    async fn reset(&self) -> Result<(), GatewayError>;
}
