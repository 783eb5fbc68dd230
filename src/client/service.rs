use anyhow::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    api::{
        gateway::GraphQLGateway,
        graphql::GraphQLRequest,
        operations::{
            self, DeleteAppFromDeviceInput, GetNotificationSettingsData,
            GetUserAndDeviceNotificationSettingsData, GetSettingsInput,
            GetUserAndDeviceSettingsInput, RegisterAppOnDeviceInput, USER_SCOPE_DEVICE_ID,
            UpdateInfoInput, UpdateSettingsInput,
        },
    },
    configuration::{
        NotificationConfiguration, NotificationFilterItem, NotificationMetaData,
        NotificationSettingsInput, UserAndDeviceNotificationConfiguration,
        UserNotificationSettingsInput, transformer,
    },
    device::DeviceInputProvider,
    error::{
        NotificationError,
        interpreter::{RemoteError, interpret_gateway_error, interpret_remote_error},
        normalize::interpret_failure,
    },
    handler::{NotifiableClient, PlatformPayload, PushMessage, is_notifiable},
    session::SessionProvider,
    settings::Settings,
};

/// Registers devices with the notification service, manages their filter
/// configuration and routes received push payloads to the registered
/// handlers.
pub struct NotificationClient<G: GraphQLGateway, S: SessionProvider> {
    gateway: Arc<G>,
    session: Arc<S>,
    bundle_id: String,
    handlers: Vec<Arc<dyn NotifiableClient>>,
}

impl<G: GraphQLGateway, S: SessionProvider> NotificationClient<G, S> {
    /// Creates the client, checking that the API service is configured and
    /// that every handler is allowed to receive notifications.
    pub fn new(
        settings: &Settings,
        gateway: Arc<G>,
        session: Arc<S>,
        handlers: Vec<Arc<dyn NotifiableClient>>,
    ) -> Result<Self, NotificationError> {
        let has_api_url = settings
            .api_service
            .as_ref()
            .is_some_and(|api| !api.api_url.is_empty());
        if !has_api_url {
            return Err(NotificationError::InvalidConfig(
                "api_service.api_url is not configured".to_string(),
            ));
        }

        let notification_settings = settings
            .notification_service
            .as_ref()
            .ok_or(NotificationError::NoNotificationConfig)?;

        for handler in &handlers {
            let service_name = handler.service_name();
            if !is_notifiable(
                service_name,
                &notification_settings.notifiable_services,
                settings.service(service_name),
            ) {
                return Err(NotificationError::InvalidConfig(format!(
                    "Service {} is not notifiable",
                    service_name
                )));
            }
        }

        Ok(Self {
            gateway,
            session,
            bundle_id: notification_settings.bundle_id.clone(),
            handlers,
        })
    }

    /// Schemas of all registered handlers.
    pub fn schemas(&self) -> Vec<NotificationMetaData> {
        self.handlers.iter().map(|handler| handler.schema()).collect()
    }

    #[instrument(skip_all, fields(device_id = %device.device_id()))]
    pub async fn register_notification(
        &self,
        device: &dyn DeviceInputProvider,
    ) -> Result<(), NotificationError> {
        let result: Result<()> = async {
            self.ensure_signed_in().await?;

            let input = RegisterAppOnDeviceInput {
                bundle_id: device.bundle_id().to_string(),
                device_id: device.device_id().to_string(),
                client_env: device.client_env().to_string(),
                standard_token: device.push_token().to_string(),
                build_type: device.build_type().to_string(),
                locale: device.locale().to_string(),
                version: device.app_version().to_string(),
            };
            self.mutate(operations::register_app_on_device(&input)?)
                .await
        }
        .await;

        result.map_err(interpret_failure)
    }

    #[instrument(skip_all, fields(device_id = %device.device_id()))]
    pub async fn deregister_notification(
        &self,
        device: &dyn DeviceInputProvider,
    ) -> Result<(), NotificationError> {
        let result: Result<()> = async {
            self.ensure_signed_in().await?;

            let input = DeleteAppFromDeviceInput {
                bundle_id: device.bundle_id().to_string(),
                device_id: device.device_id().to_string(),
            };
            self.mutate(operations::delete_app_from_device(&input)?)
                .await
        }
        .await;

        result.map_err(interpret_failure)
    }

    #[instrument(skip_all, fields(device_id = %device.device_id()))]
    pub async fn update_notification_registration(
        &self,
        device: &dyn DeviceInputProvider,
    ) -> Result<(), NotificationError> {
        let result: Result<()> = async {
            self.ensure_signed_in().await?;

            let input = UpdateInfoInput {
                bundle_id: device.bundle_id().to_string(),
                device_id: device.device_id().to_string(),
                standard_token: device.push_token().to_string(),
                build_type: device.build_type().to_string(),
                locale: device.locale().to_string(),
                version: device.app_version().to_string(),
            };
            self.mutate(operations::update_device_info(&input)?).await
        }
        .await;

        result.map_err(interpret_failure)
    }

    #[instrument(skip_all, fields(device_id = %device.device_id()))]
    pub async fn get_notification_configuration(
        &self,
        device: &dyn DeviceInputProvider,
    ) -> Result<NotificationConfiguration, NotificationError> {
        let result: Result<NotificationConfiguration> = async {
            self.ensure_signed_in().await?;

            let input = GetSettingsInput {
                bundle_id: device.bundle_id().to_string(),
                device_id: device.device_id().to_string(),
            };
            let data: Option<GetNotificationSettingsData> = self
                .query(operations::get_notification_settings(&input)?)
                .await?;

            let settings = data
                .and_then(|data| data.get_notification_settings)
                .ok_or_else(|| NotificationError::NoDevice(input.device_id.clone()))?;
            Ok(transformer::to_configuration(settings))
        }
        .await;

        result.map_err(interpret_failure)
    }

    #[instrument(skip(self))]
    pub async fn get_user_notification_configuration(
        &self,
    ) -> Result<Option<NotificationConfiguration>, NotificationError> {
        let result: Result<Option<NotificationConfiguration>> = async {
            self.ensure_signed_in().await?;

            let input = GetSettingsInput {
                bundle_id: self.bundle_id.clone(),
                device_id: USER_SCOPE_DEVICE_ID.to_string(),
            };
            let data: Option<GetNotificationSettingsData> = self
                .query(operations::get_notification_settings(&input)?)
                .await?;

            Ok(data
                .and_then(|data| data.get_notification_settings)
                .map(transformer::to_configuration))
        }
        .await;

        result.map_err(interpret_failure)
    }

    #[instrument(skip_all, fields(device_id = %device.device_id()))]
    pub async fn get_user_and_device_notification_configuration(
        &self,
        device: &dyn DeviceInputProvider,
    ) -> Result<UserAndDeviceNotificationConfiguration, NotificationError> {
        let result: Result<UserAndDeviceNotificationConfiguration> = async {
            self.ensure_signed_in().await?;

            let input = GetUserAndDeviceSettingsInput {
                bundle_id: device.bundle_id().to_string(),
                device_id: device.device_id().to_string(),
            };
            let data: Option<GetUserAndDeviceNotificationSettingsData> = self
                .query(operations::get_user_and_device_notification_settings(
                    &input,
                )?)
                .await?;

            let settings = data
                .and_then(|data| data.get_user_and_device_notification_settings)
                .unwrap_or_default();
            Ok(UserAndDeviceNotificationConfiguration {
                user: settings.user.map(transformer::to_configuration),
                device: settings.device.map(transformer::to_configuration),
            })
        }
        .await;

        result.map_err(interpret_failure)
    }

    /// Replaces the device's filters. Returns a configuration holding the
    /// filters that were sent.
    #[instrument(skip_all, fields(device_id = %config.device_id))]
    pub async fn set_notification_configuration(
        &self,
        config: NotificationSettingsInput,
    ) -> Result<NotificationConfiguration, NotificationError> {
        let result: Result<NotificationConfiguration> = async {
            self.ensure_signed_in().await?;

            validate_settings(
                &config.bundle_id,
                &config.device_id,
                &config.filter,
                &config.services,
            )?;
            self.update_settings(
                &config.bundle_id,
                &config.device_id,
                &config.filter,
                &config.services,
            )
            .await?;

            Ok(NotificationConfiguration::new(config.filter.clone()))
        }
        .await;

        result.map_err(interpret_failure)
    }

    /// Replaces the user's filters. Returns a configuration holding the
    /// filters that were sent.
    #[instrument(skip_all)]
    pub async fn set_user_notification_configuration(
        &self,
        config: UserNotificationSettingsInput,
    ) -> Result<NotificationConfiguration, NotificationError> {
        let result: Result<NotificationConfiguration> = async {
            self.ensure_signed_in().await?;

            validate_settings(
                &config.bundle_id,
                USER_SCOPE_DEVICE_ID,
                &config.filter,
                &config.services,
            )?;
            self.update_settings(
                &config.bundle_id,
                USER_SCOPE_DEVICE_ID,
                &config.filter,
                &config.services,
            )
            .await?;

            Ok(NotificationConfiguration::new(config.filter.clone()))
        }
        .await;

        result.map_err(interpret_failure)
    }

    /// Hands a received push message to the handler of the service it is
    /// addressed to. Messages for services without a handler are ignored.
    #[instrument(skip_all)]
    pub fn process(&self, message: &PushMessage) -> Result<(), NotificationError> {
        let payload = PlatformPayload::from_message(message)?;

        let handler = self
            .handlers
            .iter()
            .find(|handler| handler.service_name() == payload.servicename);

        match handler {
            Some(handler) => {
                debug!(service = %payload.servicename, "Dispatching push payload");
                handler.process_payload(message);
            }
            None => {
                info!(service = %payload.servicename, "No handler for service, ignoring payload");
            }
        }

        Ok(())
    }

    /// Clears anything the transport keeps between requests.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), NotificationError> {
        self.gateway
            .reset()
            .await
            .map_err(|err| interpret_gateway_error(&err))
    }

    async fn ensure_signed_in(&self) -> Result<()> {
        if !self.session.is_signed_in().await? {
            return Err(NotificationError::NotSignedIn.into());
        }
        Ok(())
    }

    async fn update_settings(
        &self,
        bundle_id: &str,
        device_id: &str,
        filter: &[NotificationFilterItem],
        services: &[NotificationMetaData],
    ) -> Result<()> {
        let input = UpdateSettingsInput {
            bundle_id: bundle_id.to_string(),
            device_id: device_id.to_string(),
            filter: filter.iter().map(transformer::to_filter_input).collect(),
            services: services.iter().map(transformer::to_schema_input).collect(),
        };
        self.mutate(operations::update_notification_settings(&input)?)
            .await
    }

    async fn mutate(&self, request: GraphQLRequest) -> Result<()> {
        self.query::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Sends one request. GraphQL errors are interpreted here, transport
    /// failures as soon as they are returned.
    async fn query<T: DeserializeOwned>(&self, request: GraphQLRequest) -> Result<Option<T>> {
        let response = self
            .gateway
            .execute(request)
            .await
            .map_err(|err| interpret_gateway_error(&err))?;

        if let Some(error) = response.first_error() {
            return Err(interpret_remote_error(&RemoteError::from(error)).into());
        }

        Ok(response.data.map(serde_json::from_value).transpose()?)
    }
}

fn validate_settings(
    bundle_id: &str,
    device_id: &str,
    filter: &[NotificationFilterItem],
    services: &[NotificationMetaData],
) -> Result<(), NotificationError> {
    if bundle_id.is_empty() {
        return Err(NotificationError::InvalidArgument(
            "bundle_id must not be empty".to_string(),
        ));
    }
    if device_id.is_empty() {
        return Err(NotificationError::InvalidArgument(
            "device_id must not be empty".to_string(),
        ));
    }
    if filter.iter().any(|item| item.service_name.is_empty()) {
        return Err(NotificationError::InvalidArgument(
            "filter item without service name".to_string(),
        ));
    }
    if services.iter().any(|meta| meta.service_name.is_empty()) {
        return Err(NotificationError::InvalidArgument(
            "schema without service name".to_string(),
        ));
    }
    Ok(())
}
