//! GraphQL request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GraphQL request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    /// The GraphQL query or mutation document.
    pub query: String,
    /// Operation name, used by the remote API to select the operation.
    pub operation_name: String,
    /// Variables for the operation.
    pub variables: Value,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>, operation_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: operation_name.into(),
            variables: Value::Object(Default::default()),
        }
    }

    /// Sets the `input` variable shared by every notification operation.
    pub fn with_input<T: Serialize>(mut self, input: &T) -> Result<Self, serde_json::Error> {
        let mut variables = serde_json::Map::new();
        variables.insert("input".to_string(), serde_json::to_value(input)?);
        self.variables = Value::Object(variables);
        Ok(self)
    }

    /// Decodes the `input` variable, if present.
    pub fn input<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(self.variables.get("input").cloned().unwrap_or(Value::Null))
    }
}

/// GraphQL response from the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLResponseError>>,
}

impl GraphQLResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    pub fn with_error(error: GraphQLResponseError) -> Self {
        Self {
            data: None,
            errors: Some(vec![error]),
        }
    }

    /// The first reported error; the remote API reports one error per operation.
    pub fn first_error(&self) -> Option<&GraphQLResponseError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

/// A GraphQL error from the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLResponseError {
    pub message: String,
    /// Error type as set by the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLResponseError {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: Some(error_type.into()),
            ..Default::default()
        }
    }

    /// The error type, falling back to `extensions.errorType`.
    pub fn error_type(&self) -> Option<String> {
        self.error_type.clone().or_else(|| {
            self.extensions
                .as_ref()
                .and_then(|ext| ext.get("errorType"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }
}
