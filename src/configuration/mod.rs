pub mod entities;
pub mod transformer;

pub use entities::{
    NotificationConfiguration, NotificationFilterItem, NotificationMetaData,
    NotificationSchemaEntry, NotificationSettingsInput, NotificationStatus,
    UserAndDeviceNotificationConfiguration, UserNotificationSettingsInput,
};
