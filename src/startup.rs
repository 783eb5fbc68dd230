use anyhow::Result;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    NotificationClient, NotificationError,
    api::gateway::{http::HttpGraphQLGateway, inmemory::InMemoryNotificationGateway},
    handler::{NotifiableClient, logging::LoggingNotifiableClient},
    session::StaticSession,
    settings::Settings,
};

pub type HttpNotificationClient =
    NotificationClient<HttpGraphQLGateway<StaticSession>, StaticSession>;
pub type OfflineNotificationClient =
    NotificationClient<InMemoryNotificationGateway<StaticSession>, StaticSession>;

/// A logging handler for every service the settings declare notifiable.
///
/// Names are compared without regard to case. Environment overrides arrive
/// lower-cased, so a name spelled with capitals (as written in the settings
/// file) wins over its lower-cased duplicate. A service that is only declared
/// through the environment keeps its lower-cased name and only receives
/// payloads addressed with that spelling.
pub fn logging_handlers(settings: &Settings) -> Vec<Arc<dyn NotifiableClient>> {
    let legacy = settings
        .notification_service
        .iter()
        .flat_map(|notification| notification.notifiable_services.iter().cloned());
    let mut flagged: Vec<String> = settings
        .services
        .iter()
        .filter(|(_, service)| service.notifiable)
        .map(|(name, _)| name.clone())
        .collect();
    flagged.sort();

    let mut names: BTreeMap<String, String> = BTreeMap::new();
    for name in legacy.chain(flagged) {
        let key = name.to_lowercase();
        match names.get(&key) {
            Some(existing) if *existing != key => {}
            _ => {
                names.insert(key, name);
            }
        }
    }

    names
        .into_values()
        .map(|name| Arc::new(LoggingNotifiableClient::new(name)) as Arc<dyn NotifiableClient>)
        .collect()
}

/// Creates a client talking to the configured API endpoint
pub fn start_http_client(settings: &Settings, token: Option<String>) -> Result<HttpNotificationClient> {
    let api_settings = settings.api_service.as_ref().ok_or_else(|| {
        NotificationError::InvalidConfig("api_service is not configured".to_string())
    })?;

    let session = Arc::new(StaticSession::new(token));
    let gateway = HttpGraphQLGateway::from_settings(api_settings, session.clone())?;

    Ok(NotificationClient::new(
        settings,
        Arc::new(gateway),
        session,
        logging_handlers(settings),
    )?)
}

/// Creates a client backed by the in-memory notification service
pub fn start_offline_client(
    settings: &Settings,
    token: Option<String>,
) -> Result<OfflineNotificationClient> {
    let session = Arc::new(StaticSession::new(token));
    Ok(NotificationClient::new(
        settings,
        Arc::new(InMemoryNotificationGateway::new(session.clone())),
        session,
        logging_handlers(settings),
    )?)
}
