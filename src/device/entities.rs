use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientEnv {
    Android,
    Ios,
    Test,
}

impl fmt::Display for ClientEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ClientEnv::Android => "ANDROID",
            ClientEnv::Ios => "IOS",
            ClientEnv::Test => "TEST",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildType {
    Debug,
    Release,
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            BuildType::Debug => "DEBUG",
            BuildType::Release => "RELEASE",
        };
        f.write_str(value)
    }
}

/// Identity of one installed application instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_id: String,
    pub bundle_id: String,
    pub client_env: ClientEnv,
    pub build_type: BuildType,
    pub app_version: String,
    pub locale: String,
    pub push_token: String,
}
