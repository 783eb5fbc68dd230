pub mod api;
pub mod client;
pub mod configuration;
pub mod device;
pub mod error;
pub mod handler;
pub mod session;
pub mod settings;
pub mod startup;

pub use client::NotificationClient;
pub use error::NotificationError;
