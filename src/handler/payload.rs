use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::NotificationError;

/// Data key carrying the platform's routing envelope.
pub const PLATFORM_DATA_KEY: &str = "sudoplatform";

/// A received push message, as handed over by the push provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl PushMessage {
    pub fn new(data: HashMap<String, String>) -> Self {
        Self { data }
    }
}

/// The decoded `sudoplatform` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlatformPayload {
    pub servicename: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PlatformPayload {
    pub fn from_message(message: &PushMessage) -> Result<Self, NotificationError> {
        let data = message
            .data
            .get(PLATFORM_DATA_KEY)
            .map(String::as_str)
            .unwrap_or_default();

        if data.is_empty() {
            return Err(NotificationError::NotificationPayload(format!(
                "Missing {} data",
                PLATFORM_DATA_KEY
            )));
        }

        serde_json::from_str(data).map_err(|err| {
            NotificationError::NotificationPayload(format!(
                "Malformed {} data: {}",
                PLATFORM_DATA_KEY, err
            ))
        })
    }
}
