#![deny(missing_docs)]

//! # Document Model
//!
//! The emitted OpenAPI 3.0 document. Only the parts the service mapper fills
//! in are modelled; everything serializes in insertion order.

use crate::error::{AppError, AppResult};
use crate::oas::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Version written into the `openapi` field.
pub const OPENAPI_VERSION: &str = "3.0.1";

/// Operations of a path keyed by lower-case method.
pub type PathItem = IndexMap<String, Operation>;

/// Ordered status code -> response map.
pub type ApiResponses = IndexMap<String, ApiResponse>;

/// Root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// `3.0.1`
    pub openapi: String,
    /// Info object.
    pub info: Info,
    /// Servers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Paths.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl OpenApiDocument {
    /// Serializes to YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::General(format!("Failed to serialize OpenAPI YAML: {}", e)))
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::General(format!("Failed to serialize OpenAPI JSON: {}", e)))
    }

    /// Looks up an operation.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }

    /// Looks up a component schema.
    pub fn component(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref().and_then(|c| c.schemas.get(name))
    }
}

/// Info object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// URL template.
    pub url: String,
    /// Template variables.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// Server variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    /// Default substitution.
    pub default: String,
}

/// Operation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation id.
    pub operation_id: String,
    /// Operation description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses.
    pub responses: ApiResponses,
}

/// Parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// `path`, `query` or `header`.
    #[serde(rename = "in")]
    pub location: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Schema,
}

/// Request body object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
}

/// Response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Description.
    pub description: String,
    /// Headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    /// Content by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl ApiResponse {
    /// A response without content or headers.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: IndexMap::new(),
            content: IndexMap::new(),
        }
    }
}

/// Media type object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Body schema; absent for unconstrained bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Header object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value schema.
    pub schema: Schema,
}

/// Components object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}
