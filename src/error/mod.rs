pub mod interpreter;
pub mod normalize;

use thiserror::Error;

/// Errors surfaced by every public operation of the notification client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("No notification configuration found")]
    NoNotificationConfig,

    #[error("Account locked")]
    AccountLocked,

    #[error("Device already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Device not found: {0}")]
    NoDevice(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid notification payload: {0}")]
    NotificationPayload(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to create device: {0}")]
    DeviceCreateFailed(String),

    #[error("Failed to read device: {0}")]
    DeviceReadFailed(String),

    #[error("Failed to update device: {0}")]
    DeviceUpdateFailed(String),

    #[error("Failed to delete device: {0}")]
    DeviceDeleteFailed(String),

    #[error("Failed to read user info: {0}")]
    UserInfoReadFailed(String),

    #[error("Failed to update user info: {0}")]
    UserInfoUpdateFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
