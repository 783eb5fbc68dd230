use std::fmt;

use super::NotificationError;
use crate::{
    api::{gateway::GatewayError, graphql::GraphQLResponseError},
    session::SessionError,
};

/// Namespace the notification service prefixes its error types with.
pub const ERROR_TYPE_PREFIX: &str = "sudoplatform.ns.";

type ErrorConstructor = fn(String) -> NotificationError;

/// Known error codes, without the namespace prefix.
static ERROR_CODES: [(&str, ErrorConstructor); 9] = [
    ("ServiceError", NotificationError::Service),
    ("DeviceExist", NotificationError::AlreadyRegistered),
    ("DeviceNotFound", NotificationError::NoDevice),
    ("DeviceUpdateFailed", NotificationError::DeviceUpdateFailed),
    ("DeviceDeleteFailed", NotificationError::DeviceDeleteFailed),
    ("DeviceReadFailed", NotificationError::DeviceReadFailed),
    ("DeviceCreateFailed", NotificationError::DeviceCreateFailed),
    ("UserInfoUpdateFailed", NotificationError::UserInfoUpdateFailed),
    ("UserInfoReadFailed", NotificationError::UserInfoReadFailed),
];

/// An error reported by the remote API, either as an HTTP status or as a
/// GraphQL error carrying an error type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteError {
    pub status: Option<u16>,
    pub error_type: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, error_type: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "HTTP {}: ", status)?;
        }
        if let Some(error_type) = &self.error_type {
            write!(f, "[{}] ", error_type)?;
        }
        write!(f, "{}", self.message)
    }
}

impl From<&GraphQLResponseError> for RemoteError {
    fn from(error: &GraphQLResponseError) -> Self {
        RemoteError::new(None, error.error_type(), error.message.clone())
    }
}

/// Maps a remote error to the client's error taxonomy.
///
/// HTTP status takes precedence over the error type, so an authorization or
/// server failure is never reported as a domain error.
pub fn interpret_remote_error(error: &RemoteError) -> NotificationError {
    match error.status {
        Some(401) => return NotificationError::NotAuthorized(error.message.clone()),
        Some(status) if status >= 500 => return NotificationError::RequestFailed(error.to_string()),
        _ => {}
    }

    if let Some(constructor) = error.error_type.as_deref().and_then(lookup_error_code) {
        return constructor(error.message.clone());
    }

    NotificationError::RequestFailed(error.to_string())
}

/// Maps a transport failure to the client's error taxonomy.
pub fn interpret_gateway_error(error: &GatewayError) -> NotificationError {
    match error {
        GatewayError::Http {
            status,
            error_type,
            message,
        } => interpret_remote_error(&RemoteError::new(
            Some(*status),
            error_type.clone(),
            message.clone(),
        )),
        GatewayError::Unauthorized(msg) => NotificationError::NotAuthorized(msg.clone()),
        GatewayError::Session(session) => interpret_session_error(session),
        GatewayError::Transport(_) | GatewayError::Timeout => {
            NotificationError::RequestFailed(error.to_string())
        }
        GatewayError::Serialization(_) => NotificationError::Unknown(error.to_string()),
    }
}

/// Maps a failure of the sign-in state to the client's error taxonomy.
pub fn interpret_session_error(error: &SessionError) -> NotificationError {
    match error {
        SessionError::NotAuthorized(msg) => NotificationError::NotAuthorized(msg.clone()),
        SessionError::AccountLocked => NotificationError::AccountLocked,
        SessionError::Failed(msg) => NotificationError::Unknown(msg.clone()),
    }
}

/// Exact match on the full or short code first, then substring containment.
fn lookup_error_code(error_type: &str) -> Option<ErrorConstructor> {
    let short = error_type
        .strip_prefix(ERROR_TYPE_PREFIX)
        .unwrap_or(error_type);

    ERROR_CODES
        .iter()
        .find(|(code, _)| *code == short)
        .or_else(|| {
            ERROR_CODES
                .iter()
                .find(|(code, _)| error_type.contains(code))
        })
        .map(|(_, constructor)| *constructor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(status: Option<u16>, error_type: &str) -> RemoteError {
        RemoteError::new(status, Some(error_type.to_string()), "boom")
    }

    #[test]
    fn test_unauthorized_status_wins_over_error_type() {
        let error = typed(Some(401), "sudoplatform.ns.DeviceExist");
        assert_eq!(
            interpret_remote_error(&error),
            NotificationError::NotAuthorized("boom".to_string())
        );
    }

    #[test]
    fn test_server_status_is_request_failed() {
        let error = typed(Some(503), "sudoplatform.ns.DeviceNotFound");
        assert!(matches!(
            interpret_remote_error(&error),
            NotificationError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_device_exist_without_status_is_already_registered() {
        let error = typed(None, "sudoplatform.ns.DeviceExist");
        assert_eq!(
            interpret_remote_error(&error),
            NotificationError::AlreadyRegistered("boom".to_string())
        );
    }

    #[test]
    fn test_error_type_matched_by_substring() {
        let error = typed(None, "prefix:DeviceNotFoundError:suffix");
        assert!(matches!(
            interpret_remote_error(&error),
            NotificationError::NoDevice(_)
        ));
    }

    #[test]
    fn test_every_known_code_maps_to_its_kind() {
        let cases = [
            ("ServiceError", NotificationError::Service("boom".into())),
            ("DeviceUpdateFailed", NotificationError::DeviceUpdateFailed("boom".into())),
            ("DeviceDeleteFailed", NotificationError::DeviceDeleteFailed("boom".into())),
            ("DeviceReadFailed", NotificationError::DeviceReadFailed("boom".into())),
            ("DeviceCreateFailed", NotificationError::DeviceCreateFailed("boom".into())),
            ("UserInfoUpdateFailed", NotificationError::UserInfoUpdateFailed("boom".into())),
            ("UserInfoReadFailed", NotificationError::UserInfoReadFailed("boom".into())),
        ];

        for (code, expected) in cases {
            let error = typed(Some(400), &format!("{}{}", ERROR_TYPE_PREFIX, code));
            assert_eq!(interpret_remote_error(&error), expected, "code {}", code);
        }
    }

    #[test]
    fn test_unknown_error_type_is_request_failed_with_raw_text() {
        let error = typed(None, "sudoplatform.SomethingElse");
        let NotificationError::RequestFailed(msg) = interpret_remote_error(&error) else {
            panic!("expected RequestFailed");
        };
        assert!(msg.contains("sudoplatform.SomethingElse"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_missing_error_type_is_request_failed() {
        let error = RemoteError::new(Some(400), None, "bad request");
        assert!(matches!(
            interpret_remote_error(&error),
            NotificationError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_gateway_http_error_goes_through_status_rules() {
        let error = GatewayError::Http {
            status: 401,
            error_type: Some("sudoplatform.ns.ServiceError".to_string()),
            message: "expired token".to_string(),
        };
        assert_eq!(
            interpret_gateway_error(&error),
            NotificationError::NotAuthorized("expired token".to_string())
        );
    }

    #[test]
    fn test_gateway_timeout_is_request_failed() {
        assert!(matches!(
            interpret_gateway_error(&GatewayError::Timeout),
            NotificationError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_gateway_session_error_keeps_its_kind() {
        assert_eq!(
            interpret_gateway_error(&GatewayError::Session(SessionError::AccountLocked)),
            NotificationError::AccountLocked
        );
        assert_eq!(
            interpret_gateway_error(&GatewayError::Session(SessionError::NotAuthorized(
                "expired".to_string()
            ))),
            NotificationError::NotAuthorized("expired".to_string())
        );
    }
}
