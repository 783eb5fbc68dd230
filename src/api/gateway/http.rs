use async_trait::async_trait;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tracing::instrument;

use super::{GatewayError, GraphQLGateway};
use crate::{
    api::graphql::{GraphQLRequest, GraphQLResponse},
    session::SessionProvider,
    settings::ApiServiceSettings,
};

/// GraphQL over HTTPS, authenticated with the session's bearer token.
pub struct HttpGraphQLGateway<S: SessionProvider> {
    client: Client,
    endpoint: String,
    session: Arc<S>,
}

impl<S: SessionProvider> HttpGraphQLGateway<S> {
    pub fn new(endpoint: &str, timeout: Duration, session: Arc<S>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            session,
        })
    }

    pub fn from_settings(
        settings: &ApiServiceSettings,
        session: Arc<S>,
    ) -> Result<Self, GatewayError> {
        Self::new(
            &settings.api_url,
            Duration::from_secs(settings.timeout_secs),
            session,
        )
    }
}

#[async_trait]
impl<S: SessionProvider> GraphQLGateway for HttpGraphQLGateway<S> {
    #[instrument(skip_all, fields(operation = %request.operation_name))]
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse, GatewayError> {
        let token = self.session.access_token().await?;

        let mut http_request = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), "GraphQL response received");

        if !status.is_success() {
            return Err(http_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn reset(&self) -> Result<(), GatewayError> {
        // Requests are not cached by this transport.
        tracing::debug!("HTTP gateway reset");
        Ok(())
    }
}

/// Builds the error for a non-success response, lifting the GraphQL error type
/// from the body when there is one.
fn http_error(status: u16, body: &str) -> GatewayError {
    let first_error = serde_json::from_str::<GraphQLResponse>(body)
        .ok()
        .and_then(|response| response.first_error().cloned());

    match first_error {
        Some(error) => GatewayError::Http {
            status,
            error_type: error.error_type(),
            message: error.message,
        },
        None => GatewayError::Http {
            status,
            error_type: None,
            message: body.to_string(),
        },
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MockSessionProvider, SessionError};

    #[test]
    fn test_http_error_lifts_error_type_from_body() {
        let body = r#"{"errors":[{"message":"token expired","errorType":"UnauthorizedException"}]}"#;
        assert_eq!(
            http_error(401, body),
            GatewayError::Http {
                status: 401,
                error_type: Some("UnauthorizedException".to_string()),
                message: "token expired".to_string(),
            }
        );
    }

    #[test]
    fn test_http_error_keeps_plain_body() {
        assert_eq!(
            http_error(502, "Bad Gateway"),
            GatewayError::Http {
                status: 502,
                error_type: None,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_locked_session_fails_before_sending() {
        let mut session = MockSessionProvider::new();
        session
            .expect_access_token()
            .once()
            .returning(|| Err(SessionError::AccountLocked));

        let gateway = HttpGraphQLGateway::new(
            "http://127.0.0.1:9/graphql",
            Duration::from_secs(1),
            Arc::new(session),
        )
        .unwrap();

        let result = gateway
            .execute(GraphQLRequest::new("query Q { q }", "Q"))
            .await;
        assert_eq!(result, Err(GatewayError::Session(SessionError::AccountLocked)));
    }
}
