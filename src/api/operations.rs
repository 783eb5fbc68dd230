//! Operations of the notification service API and their wire types.
//!
//! Field names follow the remote schema exactly.

use serde::{Deserialize, Serialize};

use super::graphql::GraphQLRequest;

pub const REGISTER_APP_ON_DEVICE: &str = "RegisterAppOnDevice";
pub const DELETE_APP_FROM_DEVICE: &str = "DeleteAppFromDevice";
pub const UPDATE_DEVICE_INFO: &str = "UpdateDeviceInfo";
pub const GET_NOTIFICATION_SETTINGS: &str = "GetNotificationSettings";
pub const GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS: &str = "GetUserAndDeviceNotificationSettings";
pub const UPDATE_NOTIFICATION_SETTINGS: &str = "UpdateNotificationSettings";

/// Device id the service uses for user-scoped settings.
pub const USER_SCOPE_DEVICE_ID: &str = "*";

const REGISTER_APP_ON_DEVICE_DOCUMENT: &str = r#"mutation RegisterAppOnDevice($input: RegisterAppOnDeviceInput!) {
  registerAppOnDevice(input: $input)
}"#;

const DELETE_APP_FROM_DEVICE_DOCUMENT: &str = r#"mutation DeleteAppFromDevice($input: DeleteAppFromDeviceInput!) {
  deleteAppFromDevice(input: $input)
}"#;

const UPDATE_DEVICE_INFO_DOCUMENT: &str = r#"mutation UpdateDeviceInfo($input: UpdateInfoInput!) {
  updateDeviceInfo(input: $input)
}"#;

const GET_NOTIFICATION_SETTINGS_DOCUMENT: &str = r#"query GetNotificationSettings($input: GetSettingsInput!) {
  getNotificationSettings(input: $input) {
    filter { serviceName actionType rule enableMeta }
  }
}"#;

const GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS_DOCUMENT: &str = r#"query GetUserAndDeviceNotificationSettings($input: GetUserAndDeviceSettingsInput!) {
  getUserAndDeviceNotificationSettings(input: $input) {
    user { filter { serviceName actionType rule enableMeta } }
    device { filter { serviceName actionType rule enableMeta } }
  }
}"#;

const UPDATE_NOTIFICATION_SETTINGS_DOCUMENT: &str = r#"mutation UpdateNotificationSettings($input: UpdateSettingsInput!) {
  updateNotificationSettings(input: $input)
}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAppOnDeviceInput {
    pub bundle_id: String,
    pub device_id: String,
    pub client_env: String,
    pub standard_token: String,
    pub build_type: String,
    pub locale: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAppFromDeviceInput {
    pub bundle_id: String,
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfoInput {
    pub bundle_id: String,
    pub device_id: String,
    pub standard_token: String,
    pub build_type: String,
    pub locale: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSettingsInput {
    pub bundle_id: String,
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserAndDeviceSettingsInput {
    pub bundle_id: String,
    pub device_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterAction {
    #[serde(alias = "enable", alias = "Enable")]
    Enable,
    #[serde(alias = "disable", alias = "Disable")]
    Disable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    pub service_name: String,
    pub action_type: FilterAction,
    pub rule: String,
    pub enable_meta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntryInput {
    pub description: String,
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifiableServiceSchemaInput {
    pub service_name: String,
    pub schema: Vec<SchemaEntryInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsInput {
    pub bundle_id: String,
    pub device_id: String,
    pub filter: Vec<FilterInput>,
    pub services: Vec<NotifiableServiceSchemaInput>,
}

/// One filter as returned by the service. `rule` and `enableMeta` may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutput {
    pub service_name: String,
    pub action_type: FilterAction,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub enable_meta: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettingsOutput {
    #[serde(default)]
    pub filter: Vec<FilterOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAndDeviceSettingsOutput {
    #[serde(default)]
    pub user: Option<NotificationSettingsOutput>,
    #[serde(default)]
    pub device: Option<NotificationSettingsOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNotificationSettingsData {
    #[serde(default)]
    pub get_notification_settings: Option<NotificationSettingsOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserAndDeviceNotificationSettingsData {
    #[serde(default)]
    pub get_user_and_device_notification_settings: Option<UserAndDeviceSettingsOutput>,
}

pub fn register_app_on_device(
    input: &RegisterAppOnDeviceInput,
) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(REGISTER_APP_ON_DEVICE_DOCUMENT, REGISTER_APP_ON_DEVICE).with_input(input)
}

pub fn delete_app_from_device(
    input: &DeleteAppFromDeviceInput,
) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(DELETE_APP_FROM_DEVICE_DOCUMENT, DELETE_APP_FROM_DEVICE).with_input(input)
}

pub fn update_device_info(input: &UpdateInfoInput) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(UPDATE_DEVICE_INFO_DOCUMENT, UPDATE_DEVICE_INFO).with_input(input)
}

pub fn get_notification_settings(
    input: &GetSettingsInput,
) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(GET_NOTIFICATION_SETTINGS_DOCUMENT, GET_NOTIFICATION_SETTINGS)
        .with_input(input)
}

pub fn get_user_and_device_notification_settings(
    input: &GetUserAndDeviceSettingsInput,
) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(
        GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS_DOCUMENT,
        GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS,
    )
    .with_input(input)
}

pub fn update_notification_settings(
    input: &UpdateSettingsInput,
) -> Result<GraphQLRequest, serde_json::Error> {
    GraphQLRequest::new(UPDATE_NOTIFICATION_SETTINGS_DOCUMENT, UPDATE_NOTIFICATION_SETTINGS)
        .with_input(input)
}
