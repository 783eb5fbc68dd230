use tracing::info;

use super::{NotifiableClient, PushMessage};
use crate::configuration::NotificationMetaData;

/// Handler that only logs what it receives. Used by the command-line tool for
/// every service named in the settings.
pub struct LoggingNotifiableClient {
    service_name: String,
}

impl LoggingNotifiableClient {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl NotifiableClient for LoggingNotifiableClient {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn schema(&self) -> NotificationMetaData {
        NotificationMetaData {
            service_name: self.service_name.clone(),
            schema: Vec::new(),
        }
    }

    fn process_payload(&self, message: &PushMessage) {
        info!(service = %self.service_name, data = ?message.data, "Push payload received");
    }
}
