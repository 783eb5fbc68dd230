use std::{collections::HashMap, path::Path};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiServiceSettings {
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationServiceSettings {
    /// Bundle id of the application, used for user-scoped settings.
    pub bundle_id: String,
    /// Legacy allow-list of services that may receive notifications.
    #[serde(default)]
    pub notifiable_services: Vec<String>,
}

/// A service's own stanza, `[services.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSettings {
    #[serde(default)]
    pub notifiable: bool,
}

/// Sections are optional here so that the client can report which one is
/// missing with its own error kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_service: Option<ApiServiceSettings>,
    #[serde(default)]
    pub notification_service: Option<NotificationServiceSettings>,
    #[serde(default)]
    pub services: HashMap<String, ServiceSettings>,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .add_source(Environment::with_prefix("SUDO_NOTIFY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("SUDO_NOTIFY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn from_toml_str(toml: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// The stanza of `service_name`. Keys are matched case-insensitively since
    /// environment overrides arrive lower-cased.
    pub fn service(&self, service_name: &str) -> Option<&ServiceSettings> {
        self.services
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(service_name))
            .map(|(_, settings)| settings)
    }
}
