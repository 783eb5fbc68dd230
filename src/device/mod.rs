pub mod entities;

pub use entities::{BuildType, ClientEnv, DeviceInfo};

/// Supplies the identity of the installed application instance.
pub trait DeviceInputProvider: Send + Sync {
    fn device_id(&self) -> &str;
    fn bundle_id(&self) -> &str;
    fn client_env(&self) -> ClientEnv;
    fn build_type(&self) -> BuildType;
    fn app_version(&self) -> &str;
    fn locale(&self) -> &str;
    fn push_token(&self) -> &str;
}

impl DeviceInputProvider for DeviceInfo {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    fn client_env(&self) -> ClientEnv {
        self.client_env
    }

    fn build_type(&self) -> BuildType {
        self.build_type
    }

    fn app_version(&self) -> &str {
        &self.app_version
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn push_token(&self) -> &str {
        &self.push_token
    }
}
