use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Version stamped on configurations built by this client.
pub const CONFIGURATION_VERSION: u32 = 1;

/// Rule that matches every notification.
pub const DEFAULT_RULE: &str = r#"{"==":[1,1]}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    Enable,
    Disable,
}

impl From<bool> for NotificationStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            NotificationStatus::Enable
        } else {
            NotificationStatus::Disable
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationStatus::Enable => f.write_str("ENABLE"),
            NotificationStatus::Disable => f.write_str("DISABLE"),
        }
    }
}

/// A single rule controlling delivery of one service's notifications.
///
/// Two items are equal when service, status, rule and meta match; the id is
/// local to the configuration that holds the item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilterItem {
    pub id: Uuid,
    pub service_name: String,
    pub status: NotificationStatus,
    pub rule: String,
    pub meta: String,
}

impl NotificationFilterItem {
    pub fn new(
        service_name: impl Into<String>,
        status: NotificationStatus,
        rule: impl Into<String>,
        meta: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_name: service_name.into(),
            status,
            rule: rule.into(),
            meta: meta.into(),
        }
    }
}

impl PartialEq for NotificationFilterItem {
    fn eq(&self, other: &Self) -> bool {
        self.service_name == other.service_name
            && self.status == other.status
            && self.rule == other.rule
            && self.meta == other.meta
    }
}

impl Eq for NotificationFilterItem {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfiguration {
    pub version: u32,
    pub configs: Vec<NotificationFilterItem>,
}

impl NotificationConfiguration {
    pub fn new(configs: Vec<NotificationFilterItem>) -> Self {
        Self {
            version: CONFIGURATION_VERSION,
            configs,
        }
    }

    pub fn items_for<'a>(
        &'a self,
        service_name: &'a str,
    ) -> impl Iterator<Item = &'a NotificationFilterItem> + 'a {
        self.configs
            .iter()
            .filter(move |item| item.service_name == service_name)
    }

    /// Returns a copy with the item `id` set to `status`. `rule` and `meta`
    /// replace the item's values only when non-empty.
    pub fn update_config(&self, id: Uuid, status: bool, rule: &str, meta: &str) -> Self {
        let configs = self
            .configs
            .iter()
            .map(|item| {
                if item.id != id {
                    return item.clone();
                }
                let mut updated = item.clone();
                updated.status = NotificationStatus::from(status);
                if !rule.is_empty() {
                    updated.rule = rule.to_string();
                }
                if !meta.is_empty() {
                    updated.meta = meta.to_string();
                }
                updated
            })
            .collect();

        Self {
            version: self.version,
            configs,
        }
    }

    /// Returns a copy with an enabled, match-all item added for every service
    /// in `schemas` that has no item yet.
    pub fn init_config(&self, schemas: &[NotificationMetaData]) -> Self {
        let mut configs = self.configs.clone();
        for meta_data in schemas {
            if self.items_for(&meta_data.service_name).next().is_none() {
                configs.push(NotificationFilterItem::new(
                    meta_data.service_name.clone(),
                    NotificationStatus::Enable,
                    DEFAULT_RULE,
                    "",
                ));
            }
        }

        Self {
            version: self.version,
            configs,
        }
    }
}

impl Default for NotificationConfiguration {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// One field a service's filter rules may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSchemaEntry {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
}

/// Declares the fields a service exposes to filter rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetaData {
    pub service_name: String,
    pub schema: Vec<NotificationSchemaEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAndDeviceNotificationConfiguration {
    pub user: Option<NotificationConfiguration>,
    pub device: Option<NotificationConfiguration>,
}

/// Device-scoped configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsInput {
    pub bundle_id: String,
    pub device_id: String,
    pub filter: Vec<NotificationFilterItem>,
    pub services: Vec<NotificationMetaData>,
}

/// User-scoped configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotificationSettingsInput {
    pub bundle_id: String,
    pub filter: Vec<NotificationFilterItem>,
    pub services: Vec<NotificationMetaData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration() -> NotificationConfiguration {
        NotificationConfiguration::new(vec![
            NotificationFilterItem::new("emService", NotificationStatus::Enable, "rule-1", "meta-1"),
            NotificationFilterItem::new("vcService", NotificationStatus::Enable, "rule-2", "meta-2"),
        ])
    }

    #[test]
    fn test_items_equal_ignoring_id() {
        let a = NotificationFilterItem::new("emService", NotificationStatus::Enable, "r", "m");
        let b = NotificationFilterItem::new("emService", NotificationStatus::Enable, "r", "m");
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_config_disables_and_keeps_rule_and_meta() {
        let config = configuration();
        let id = config.configs[0].id;

        let updated = config.update_config(id, false, "", "");

        assert_eq!(updated.configs[0].status, NotificationStatus::Disable);
        assert_eq!(updated.configs[0].status.to_string(), "DISABLE");
        assert_eq!(updated.configs[0].rule, "rule-1");
        assert_eq!(updated.configs[0].meta, "meta-1");
        assert_eq!(updated.configs[0].id, id);
        assert_eq!(updated.configs[1], config.configs[1]);
    }

    #[test]
    fn test_update_config_leaves_original_untouched() {
        let config = configuration();
        let id = config.configs[1].id;

        let updated = config.update_config(id, false, "new-rule", "new-meta");

        assert_eq!(config.configs[1].status, NotificationStatus::Enable);
        assert_eq!(config.configs[1].rule, "rule-2");
        assert_eq!(updated.configs[1].rule, "new-rule");
        assert_eq!(updated.configs[1].meta, "new-meta");
    }

    #[test]
    fn test_update_config_unknown_id_changes_nothing() {
        let config = configuration();
        let updated = config.update_config(Uuid::new_v4(), false, "x", "y");
        assert_eq!(updated, config);
    }

    #[test]
    fn test_init_config_adds_defaults_for_missing_services() {
        let config = NotificationConfiguration::new(vec![NotificationFilterItem::new(
            "emService",
            NotificationStatus::Disable,
            "rule",
            "",
        )]);
        let schemas = vec![
            NotificationMetaData {
                service_name: "emService".to_string(),
                schema: vec![],
            },
            NotificationMetaData {
                service_name: "vcService".to_string(),
                schema: vec![],
            },
        ];

        let initialized = config.init_config(&schemas);

        assert_eq!(initialized.configs.len(), 2);
        assert_eq!(initialized.configs[0].status, NotificationStatus::Disable);
        let added: Vec<_> = initialized.items_for("vcService").collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].status, NotificationStatus::Enable);
        assert_eq!(added[0].rule, DEFAULT_RULE);
    }
}
