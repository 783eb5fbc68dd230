use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use super::{GatewayError, GraphQLGateway};
use crate::api::{
    graphql::{GraphQLRequest, GraphQLResponse, GraphQLResponseError},
    operations::{
        DELETE_APP_FROM_DEVICE, DeleteAppFromDeviceInput, FilterInput,
        GET_NOTIFICATION_SETTINGS, GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS, GetSettingsInput,
        GetUserAndDeviceSettingsInput, REGISTER_APP_ON_DEVICE, RegisterAppOnDeviceInput,
        UPDATE_DEVICE_INFO, UPDATE_NOTIFICATION_SETTINGS, USER_SCOPE_DEVICE_ID, UpdateInfoInput,
        UpdateSettingsInput,
    },
};
use crate::error::interpreter::ERROR_TYPE_PREFIX;
use crate::session::SessionProvider;

type DeviceKey = (String, String);

/// Owner token, bundle id and device id (`*` for the user scope).
type SettingsKey = (String, String, String);

#[derive(Debug, Clone)]
pub struct RegisteredDevice {
    pub owner: String,
    pub registration: RegisterAppOnDeviceInput,
}

/// Registrations and settings of the simulated notification service. One store
/// may back the gateways of several users.
#[derive(Default)]
pub struct InMemoryNotificationStore {
    pub devices: Mutex<HashMap<DeviceKey, RegisteredDevice>>,
    pub settings: Mutex<HashMap<SettingsKey, Vec<FilterInput>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(
        &self,
        owner: &str,
        input: RegisterAppOnDeviceInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        let mut devices = self.devices.lock().map_err(lock_error)?;

        let key = (input.bundle_id.clone(), input.device_id.clone());
        if devices.contains_key(&key) {
            return Ok(service_error("DeviceExist", "Device is already registered"));
        }

        devices.insert(
            key,
            RegisteredDevice {
                owner: owner.to_string(),
                registration: input,
            },
        );
        Ok(GraphQLResponse::with_data(json!({ "registerAppOnDevice": null })))
    }

    fn delete(
        &self,
        owner: &str,
        input: DeleteAppFromDeviceInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        let mut devices = self.devices.lock().map_err(lock_error)?;

        let key = (input.bundle_id, input.device_id);
        if !is_owned_by(devices.get(&key), owner) {
            return Ok(device_not_found());
        }

        devices.remove(&key);
        let (bundle_id, device_id) = key;
        self.settings
            .lock()
            .map_err(lock_error)?
            .remove(&(owner.to_string(), bundle_id, device_id));
        Ok(GraphQLResponse::with_data(json!({ "deleteAppFromDevice": null })))
    }

    fn update_info(
        &self,
        owner: &str,
        input: UpdateInfoInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        let mut devices = self.devices.lock().map_err(lock_error)?;

        let key = (input.bundle_id.clone(), input.device_id.clone());
        let Some(device) = devices.get_mut(&key).filter(|device| device.owner == owner) else {
            return Ok(device_not_found());
        };

        let registration = &mut device.registration;
        registration.standard_token = input.standard_token;
        registration.build_type = input.build_type;
        registration.locale = input.locale;
        registration.version = input.version;
        Ok(GraphQLResponse::with_data(json!({ "updateDeviceInfo": null })))
    }

    fn get_settings(
        &self,
        owner: &str,
        input: GetSettingsInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        let is_user_scope = input.device_id == USER_SCOPE_DEVICE_ID;
        if !is_user_scope && !self.is_registered_to(owner, &input.bundle_id, &input.device_id)? {
            return Ok(device_not_found());
        }

        let key = (owner.to_string(), input.bundle_id, input.device_id);
        let settings = self.settings.lock().map_err(lock_error)?;
        let result = match (settings.get(&key), is_user_scope) {
            (Some(filter), _) => json!({ "filter": filter }),
            (None, true) => Value::Null,
            (None, false) => json!({ "filter": [] }),
        };

        Ok(GraphQLResponse::with_data(
            json!({ "getNotificationSettings": result }),
        ))
    }

    fn get_user_and_device_settings(
        &self,
        owner: &str,
        input: GetUserAndDeviceSettingsInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        let settings = self.settings.lock().map_err(lock_error)?;

        let user_key = (
            owner.to_string(),
            input.bundle_id.clone(),
            USER_SCOPE_DEVICE_ID.to_string(),
        );
        let device_key = (owner.to_string(), input.bundle_id, input.device_id);
        let scoped = |key: &SettingsKey| match settings.get(key) {
            Some(filter) => json!({ "filter": filter }),
            None => Value::Null,
        };

        Ok(GraphQLResponse::with_data(json!({
            "getUserAndDeviceNotificationSettings": {
                "user": scoped(&user_key),
                "device": scoped(&device_key),
            }
        })))
    }

    fn update_settings(
        &self,
        owner: &str,
        input: UpdateSettingsInput,
    ) -> Result<GraphQLResponse, GatewayError> {
        if input.device_id != USER_SCOPE_DEVICE_ID
            && !self.is_registered_to(owner, &input.bundle_id, &input.device_id)?
        {
            return Ok(device_not_found());
        }

        self.settings.lock().map_err(lock_error)?.insert(
            (owner.to_string(), input.bundle_id, input.device_id),
            input.filter,
        );
        Ok(GraphQLResponse::with_data(
            json!({ "updateNotificationSettings": null }),
        ))
    }

    fn is_registered_to(
        &self,
        owner: &str,
        bundle_id: &str,
        device_id: &str,
    ) -> Result<bool, GatewayError> {
        let devices = self.devices.lock().map_err(lock_error)?;
        let key = (bundle_id.to_string(), device_id.to_string());
        Ok(is_owned_by(devices.get(&key), owner))
    }
}

/// Local stand-in for the notification service. Requests are attributed to
/// the session's access token, so a device is only visible to the user who
/// registered it.
pub struct InMemoryNotificationGateway<S: SessionProvider> {
    store: Arc<InMemoryNotificationStore>,
    session: Arc<S>,
}

impl<S: SessionProvider> InMemoryNotificationGateway<S> {
    pub fn new(session: Arc<S>) -> Self {
        Self::with_store(Arc::new(InMemoryNotificationStore::new()), session)
    }

    pub fn with_store(store: Arc<InMemoryNotificationStore>, session: Arc<S>) -> Self {
        InMemoryNotificationGateway { store, session }
    }

    pub fn store(&self) -> &Arc<InMemoryNotificationStore> {
        &self.store
    }
}

#[async_trait]
impl<S: SessionProvider> GraphQLGateway for InMemoryNotificationGateway<S> {
    #[instrument(skip_all, fields(operation = %request.operation_name))]
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse, GatewayError> {
        let owner = self
            .session
            .access_token()
            .await?
            .ok_or_else(|| GatewayError::Unauthorized("No access token".to_string()))?;

        let store = &self.store;
        match request.operation_name.as_str() {
            REGISTER_APP_ON_DEVICE => store.register(&owner, request.input()?),
            DELETE_APP_FROM_DEVICE => store.delete(&owner, request.input()?),
            UPDATE_DEVICE_INFO => store.update_info(&owner, request.input()?),
            GET_NOTIFICATION_SETTINGS => store.get_settings(&owner, request.input()?),
            GET_USER_AND_DEVICE_NOTIFICATION_SETTINGS => {
                store.get_user_and_device_settings(&owner, request.input()?)
            }
            UPDATE_NOTIFICATION_SETTINGS => store.update_settings(&owner, request.input()?),
            other => Ok(GraphQLResponse::with_error(GraphQLResponseError::new(
                "ValidationError",
                format!("Unknown operation {}", other),
            ))),
        }
    }

    async fn reset(&self) -> Result<(), GatewayError> {
        debug!("In-memory gateway reset");
        Ok(())
    }
}

fn is_owned_by(device: Option<&RegisteredDevice>, owner: &str) -> bool {
    device.is_some_and(|device| device.owner == owner)
}

fn service_error(code: &str, message: &str) -> GraphQLResponse {
    GraphQLResponse::with_error(GraphQLResponseError::new(
        format!("{}{}", ERROR_TYPE_PREFIX, code),
        message,
    ))
}

fn device_not_found() -> GraphQLResponse {
    service_error("DeviceNotFound", "Device not found")
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> GatewayError {
    GatewayError::Transport("Lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::operations::{
        FilterAction, delete_app_from_device, get_notification_settings, register_app_on_device,
        update_notification_settings,
    };
    use crate::session::{MockSessionProvider, SessionError, StaticSession};

    fn registration() -> RegisterAppOnDeviceInput {
        RegisterAppOnDeviceInput {
            bundle_id: "com.example.app".to_string(),
            device_id: "device-1".to_string(),
            client_env: "ANDROID".to_string(),
            standard_token: "push-token".to_string(),
            build_type: "DEBUG".to_string(),
            locale: "en-US".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn session(token: &str) -> Arc<StaticSession> {
        Arc::new(StaticSession::new(Some(token.to_string())))
    }

    fn gateway() -> InMemoryNotificationGateway<StaticSession> {
        InMemoryNotificationGateway::new(session("alice"))
    }

    fn delete_request() -> GraphQLRequest {
        delete_app_from_device(&DeleteAppFromDeviceInput {
            bundle_id: "com.example.app".to_string(),
            device_id: "device-1".to_string(),
        })
        .unwrap()
    }

    fn error_type(response: &GraphQLResponse) -> Option<String> {
        response.first_error().and_then(|error| error.error_type())
    }

    #[tokio::test]
    async fn test_register_twice_reports_device_exist() {
        let gateway = gateway();
        let request = register_app_on_device(&registration()).unwrap();

        let first = gateway.execute(request.clone()).await.unwrap();
        assert!(first.errors.is_none());

        let second = gateway.execute(request).await.unwrap();
        assert_eq!(
            error_type(&second).as_deref(),
            Some("sudoplatform.ns.DeviceExist")
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_device_reports_not_found() {
        let response = gateway().execute(delete_request()).await.unwrap();
        assert_eq!(
            error_type(&response).as_deref(),
            Some("sudoplatform.ns.DeviceNotFound")
        );
    }

    #[tokio::test]
    async fn test_delete_drops_device_settings() {
        let gateway = gateway();
        gateway
            .execute(register_app_on_device(&registration()).unwrap())
            .await
            .unwrap();
        gateway
            .execute(
                update_notification_settings(&UpdateSettingsInput {
                    bundle_id: "com.example.app".to_string(),
                    device_id: "device-1".to_string(),
                    filter: vec![FilterInput {
                        service_name: "emService".to_string(),
                        action_type: FilterAction::Enable,
                        rule: String::new(),
                        enable_meta: String::new(),
                    }],
                    services: Vec::new(),
                })
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(gateway.store().settings.lock().unwrap().len(), 1);

        gateway.execute(delete_request()).await.unwrap();

        assert!(gateway.store().settings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_of_another_owner_is_not_found() {
        let alice = gateway();
        let bob = InMemoryNotificationGateway::with_store(alice.store().clone(), session("bob"));
        alice
            .execute(register_app_on_device(&registration()).unwrap())
            .await
            .unwrap();

        let response = bob.execute(delete_request()).await.unwrap();
        assert_eq!(
            error_type(&response).as_deref(),
            Some("sudoplatform.ns.DeviceNotFound")
        );
        assert_eq!(alice.store().devices.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_settings_absent_until_set() {
        let request = get_notification_settings(&GetSettingsInput {
            bundle_id: "com.example.app".to_string(),
            device_id: USER_SCOPE_DEVICE_ID.to_string(),
        })
        .unwrap();

        let response = gateway().execute(request).await.unwrap();
        assert_eq!(
            response.data,
            Some(json!({ "getNotificationSettings": null }))
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let gateway = InMemoryNotificationGateway::new(Arc::new(StaticSession::new(None)));
        let result = gateway.execute(delete_request()).await;
        assert!(matches!(result, Err(GatewayError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_session_failure_is_passed_through() {
        let mut session = MockSessionProvider::new();
        session
            .expect_access_token()
            .once()
            .returning(|| Err(SessionError::AccountLocked));
        let gateway = InMemoryNotificationGateway::new(Arc::new(session));

        assert_eq!(
            gateway.execute(delete_request()).await,
            Err(GatewayError::Session(SessionError::AccountLocked))
        );
    }

    #[tokio::test]
    async fn test_unknown_operation_is_reported_as_error() {
        let response = gateway()
            .execute(GraphQLRequest::new("query Nope { nope }", "Nope"))
            .await
            .unwrap();

        assert_eq!(error_type(&response).as_deref(), Some("ValidationError"));
    }
}
