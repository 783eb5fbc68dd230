use super::entities::{
    NotificationConfiguration, NotificationFilterItem, NotificationMetaData, NotificationStatus,
};
use crate::api::operations::{
    FilterAction, FilterInput, FilterOutput, NotifiableServiceSchemaInput,
    NotificationSettingsOutput, SchemaEntryInput,
};

/// Builds the client-side configuration from the settings the service
/// returned. Ids are synthesized since the service does not keep them.
pub fn to_configuration(settings: NotificationSettingsOutput) -> NotificationConfiguration {
    NotificationConfiguration::new(settings.filter.into_iter().map(to_filter_item).collect())
}

fn to_filter_item(filter: FilterOutput) -> NotificationFilterItem {
    NotificationFilterItem::new(
        filter.service_name,
        to_status(filter.action_type),
        filter.rule.unwrap_or_default(),
        filter.enable_meta.unwrap_or_default(),
    )
}

fn to_status(action: FilterAction) -> NotificationStatus {
    match action {
        FilterAction::Enable => NotificationStatus::Enable,
        FilterAction::Disable => NotificationStatus::Disable,
    }
}

pub fn to_filter_input(item: &NotificationFilterItem) -> FilterInput {
    FilterInput {
        service_name: item.service_name.clone(),
        action_type: match item.status {
            NotificationStatus::Enable => FilterAction::Enable,
            NotificationStatus::Disable => FilterAction::Disable,
        },
        rule: item.rule.clone(),
        enable_meta: item.meta.clone(),
    }
}

pub fn to_schema_input(meta_data: &NotificationMetaData) -> NotifiableServiceSchemaInput {
    NotifiableServiceSchemaInput {
        service_name: meta_data.service_name.clone(),
        schema: meta_data
            .schema
            .iter()
            .map(|entry| SchemaEntryInput {
                description: entry.description.clone(),
                field_name: entry.field_name.clone(),
                field_type: entry.field_type.clone(),
            })
            .collect(),
    }
}
