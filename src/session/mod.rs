use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Account is locked")]
    AccountLocked,

    #[error("Session lookup failed: {0}")]
    Failed(String),
}

/// The signed-in state of the application user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn is_signed_in(&self) -> Result<bool, SessionError>;

    /// Token sent as bearer credentials with every API request.
    async fn access_token(&self) -> Result<Option<String>, SessionError>;
}

/// A session backed by a fixed access token. Signed in iff a token is present.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn is_signed_in(&self) -> Result<bool, SessionError> {
        Ok(self.token.is_some())
    }

    async fn access_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_session_signed_in_with_token() {
        let session = StaticSession::new(Some("token".to_string()));
        assert!(session.is_signed_in().await.unwrap());
        assert_eq!(
            session.access_token().await.unwrap().as_deref(),
            Some("token")
        );
    }

    #[tokio::test]
    async fn test_static_session_empty_token_is_signed_out() {
        let session = StaticSession::new(Some(String::new()));
        assert!(!session.is_signed_in().await.unwrap());
    }
}
