#![deny(missing_docs)]

//! # Service Declarations
//!
//! The resource-level view of a service: accessors, path segments,
//! parameters, return types, cache annotations and interceptors.

use crate::model::types::{TypeDefinition, TypeDescriptor};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A single segment of a resource path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSegment {
    /// A literal segment such as `pets`.
    Literal {
        /// Segment text (may carry identifier escapes).
        value: String,
    },
    /// `[int id]`
    Param {
        /// Parameter name.
        name: String,
        /// Parameter type.
        #[serde(rename = "type")]
        ty: TypeDescriptor,
    },
    /// `[string... rest]`
    Rest {
        /// Parameter name.
        name: String,
        /// Element type.
        #[serde(rename = "type")]
        ty: TypeDescriptor,
    },
}

/// Where a resource parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Query string parameter.
    #[display("query")]
    Query,
    /// `@http:Header`
    #[display("header")]
    Header,
    /// `@http:Payload`
    #[display("payload")]
    Payload,
    /// `http:Request`
    #[display("request")]
    Request,
    /// `http:Caller`
    #[display("caller")]
    Caller,
}

/// A resource function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceParameter {
    /// Parameter identifier.
    pub name: String,
    /// Binding kind.
    pub kind: ParameterKind,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Whether a default value is declared.
    #[serde(default)]
    pub has_default: bool,
    /// Header name override (`@http:Header {name: "..."}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    /// Media type override for payload parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Parameter documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `@http:Cache` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// `must-revalidate`
    pub must_revalidate: bool,
    /// `no-cache`
    pub no_cache: bool,
    /// `no-store`
    pub no_store: bool,
    /// `no-transform`
    pub no_transform: bool,
    /// `private` instead of `public`
    pub is_private: bool,
    /// `proxy-revalidate`
    pub proxy_revalidate: bool,
    /// `max-age`, negative to omit.
    pub max_age: i64,
    /// `s-maxage`, negative to omit.
    pub s_max_age: i64,
    /// Field names qualifying `no-cache`.
    pub no_cache_fields: Vec<String>,
    /// Field names qualifying `private`.
    pub private_fields: Vec<String>,
    /// Emit an `ETag` header.
    pub set_etag: bool,
    /// Emit a `Last-Modified` header.
    pub set_last_modified: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            must_revalidate: true,
            no_cache: false,
            no_store: false,
            no_transform: false,
            is_private: false,
            proxy_revalidate: false,
            max_age: 3600,
            s_max_age: -1,
            no_cache_fields: Vec::new(),
            private_fields: Vec::new(),
            set_etag: true,
            set_last_modified: true,
        }
    }
}

/// A resource function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceFunction {
    /// HTTP accessor (`get`, `post`, ...).
    pub method: String,
    /// Path segments relative to the service base path.
    #[serde(default)]
    pub path: Vec<PathSegment>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ResourceParameter>,
    /// Declared return type, absent for functions returning nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeDescriptor>,
    /// Cache annotation on the return type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
    /// Function documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit operation id (`@openapi:ResourceInfo`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl ResourceFunction {
    /// The payload parameter, if any.
    pub fn payload(&self) -> Option<&ResourceParameter> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::Payload)
    }
}

/// An interceptor attached to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interceptor {
    /// Interceptor name.
    pub name: String,
    /// Declared return type of its `intercept` method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeDescriptor>,
}

/// Ordered interceptors run before each resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterceptorPipeline {
    /// Interceptors in execution order.
    pub interceptors: Vec<Interceptor>,
}

/// A service attached to a listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    /// Absolute resource base path (`/pets`).
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Service documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Listener host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Listener port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Resource functions.
    #[serde(default)]
    pub resources: Vec<ResourceFunction>,
    /// Interceptor pipeline.
    #[serde(default)]
    pub interceptors: InterceptorPipeline,
}

fn default_base_path() -> String {
    "/".to_string()
}

/// CLI input: a service plus the types it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBundle {
    /// The service.
    pub service: ServiceDeclaration,
    /// User type definitions visible to the service.
    #[serde(default)]
    pub definitions: Vec<TypeDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_defaults() {
        let cache: CacheConfig = serde_json::from_value(json!({})).unwrap();
        assert!(cache.must_revalidate);
        assert_eq!(cache.max_age, 3600);
        assert_eq!(cache.s_max_age, -1);
        assert!(cache.set_etag);
    }

    #[test]
    fn test_service_bundle_parsing() {
        let bundle: ServiceBundle = serde_json::from_value(json!({
            "service": {
                "base_path": "/store",
                "resources": [{
                    "method": "get",
                    "path": [
                        {"kind": "literal", "value": "pets"},
                        {"kind": "param", "name": "id", "type": {"kind": "primitive", "name": "int"}}
                    ],
                    "parameters": [
                        {"name": "limit", "kind": "query", "type": {"kind": "primitive", "name": "int"}, "has_default": true}
                    ]
                }],
                "interceptors": [{"name": "auth"}]
            }
        }))
        .unwrap();

        let resource = &bundle.service.resources[0];
        assert_eq!(resource.path.len(), 2);
        assert!(resource.parameters[0].has_default);
        assert!(resource.payload().is_none());
        assert_eq!(bundle.service.interceptors.interceptors.len(), 1);
        assert!(bundle.definitions.is_empty());
    }
}
