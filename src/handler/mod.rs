pub mod logging;
pub mod payload;

pub use payload::{PLATFORM_DATA_KEY, PlatformPayload, PushMessage};

use crate::configuration::NotificationMetaData;
use crate::settings::ServiceSettings;

/// An application subsystem that receives the push payloads addressed to its
/// service name.
pub trait NotifiableClient: Send + Sync {
    fn service_name(&self) -> &str;

    /// Fields this service's filter rules may reference.
    fn schema(&self) -> NotificationMetaData;

    fn process_payload(&self, message: &PushMessage);
}

/// A service may receive notifications when it is on the legacy allow-list or
/// its own configuration marks it `notifiable`.
pub fn is_notifiable(
    service_name: &str,
    legacy_services: &[String],
    service_config: Option<&ServiceSettings>,
) -> bool {
    legacy_services.iter().any(|name| name == service_name)
        || service_config.is_some_and(|config| config.notifiable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> Vec<String> {
        vec!["sudoService".to_string(), "emService".to_string()]
    }

    #[test]
    fn test_notifiable_through_legacy_list() {
        assert!(is_notifiable("emService", &legacy(), None));
    }

    #[test]
    fn test_notifiable_through_service_flag() {
        let config = ServiceSettings { notifiable: true };
        assert!(is_notifiable("vcService", &[], Some(&config)));
    }

    #[test]
    fn test_service_flag_false_and_not_listed() {
        let config = ServiceSettings { notifiable: false };
        assert!(!is_notifiable("vcService", &legacy(), Some(&config)));
        assert!(!is_notifiable("vcService", &legacy(), None));
    }

    #[test]
    fn test_legacy_list_match_is_exact() {
        assert!(!is_notifiable("emservice", &legacy(), None));
    }
}
