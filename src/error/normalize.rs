use std::error::Error as StdError;

use super::{
    NotificationError,
    interpreter::{interpret_gateway_error, interpret_session_error},
};
use crate::{api::gateway::GatewayError, session::SessionError};

/// How many links of a cause chain are inspected before giving up.
pub const MAX_CAUSE_DEPTH: usize = 16;

/// Maps any failure raised while running an operation to the client's error
/// taxonomy.
///
/// Known errors pass through unchanged. Otherwise the cause chain is walked,
/// outermost first, until a recognised cause is found; anything else ends up
/// as [`NotificationError::Unknown`].
pub fn interpret_failure(err: anyhow::Error) -> NotificationError {
    let err = match err.downcast::<NotificationError>() {
        Ok(known) => return known,
        Err(err) => err,
    };

    err.chain()
        .take(MAX_CAUSE_DEPTH)
        .find_map(classify)
        .unwrap_or_else(|| NotificationError::Unknown(err.to_string()))
}

fn classify(cause: &(dyn StdError + 'static)) -> Option<NotificationError> {
    if let Some(known) = cause.downcast_ref::<NotificationError>() {
        return Some(known.clone());
    }

    if let Some(session) = cause.downcast_ref::<SessionError>() {
        return Some(interpret_session_error(session));
    }

    if let Some(gateway) = cause.downcast_ref::<GatewayError>() {
        return Some(interpret_gateway_error(gateway));
    }

    if cause.is::<std::io::Error>() || cause.is::<serde_json::Error>() {
        return Some(NotificationError::Unknown(cause.to_string()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::fmt;

    #[derive(Debug, thiserror::Error)]
    #[error("while talking to the service")]
    struct Wrapper(#[source] GatewayError);

    #[derive(Debug)]
    struct SelfCaused;

    impl fmt::Display for SelfCaused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("self caused")
        }
    }

    impl StdError for SelfCaused {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(self)
        }
    }

    #[test]
    fn test_known_error_passes_through() {
        let err = anyhow::Error::new(NotificationError::NoDevice("d".to_string()));
        assert_eq!(
            interpret_failure(err),
            NotificationError::NoDevice("d".to_string())
        );
    }

    #[test]
    fn test_known_error_under_context_passes_through() {
        let err = anyhow::Error::new(NotificationError::NotSignedIn).context("registering");
        assert_eq!(interpret_failure(err), NotificationError::NotSignedIn);
    }

    #[test]
    fn test_session_errors_are_mapped() {
        let locked = anyhow::Error::new(SessionError::AccountLocked);
        assert_eq!(interpret_failure(locked), NotificationError::AccountLocked);

        let unauthorized = anyhow::Error::new(SessionError::NotAuthorized("expired".into()));
        assert_eq!(
            interpret_failure(unauthorized),
            NotificationError::NotAuthorized("expired".to_string())
        );
    }

    #[test]
    fn test_io_error_becomes_unknown() {
        let err = anyhow::Error::new(std::io::Error::other("disk gone"));
        let NotificationError::Unknown(msg) = interpret_failure(err) else {
            panic!("expected Unknown");
        };
        assert!(msg.contains("disk gone"));
    }

    #[test]
    fn test_nested_cause_is_found() {
        let err = anyhow::Error::new(Wrapper(GatewayError::Http {
            status: 401,
            error_type: None,
            message: "denied".to_string(),
        }));
        assert_eq!(
            interpret_failure(err),
            NotificationError::NotAuthorized("denied".to_string())
        );
    }

    #[test]
    fn test_unrecognised_failure_is_unknown() {
        let err = anyhow!("something odd");
        assert_eq!(
            interpret_failure(err),
            NotificationError::Unknown("something odd".to_string())
        );
    }

    #[test]
    fn test_cyclic_cause_chain_terminates() {
        let err = anyhow::Error::new(SelfCaused);
        assert!(matches!(
            interpret_failure(err),
            NotificationError::Unknown(_)
        ));
    }
}
