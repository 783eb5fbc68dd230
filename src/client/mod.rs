pub mod service;

pub use service::NotificationClient;
