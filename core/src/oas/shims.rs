#![deny(missing_docs)]

//! # Contract Shims
//!
//! Intermediate deserialization layer for OpenAPI contracts read by the
//! validator and the service generator. Schemas are parsed into
//! `utoipa::openapi` types; the surrounding objects are plain serde structs
//! so that every map keeps document order.
//!
//! Note: these structs do not derive `Debug` because `utoipa::openapi::RefOr`
//! does not implement it.

use crate::error::{AppError, AppResult};
use crate::oas::normalization::normalize_document;
use crate::oas::ref_utils::local_component_name;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::openapi::{RefOr, Schema};

const MAX_REF_DEPTH: usize = 32;

/// Parses a YAML (or JSON) contract, normalizing 3.0 constructs first.
pub fn parse_contract(source: &str) -> AppResult<ContractDocument> {
    let mut raw: Value = serde_yaml::from_str(source)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
    normalize_document(&mut raw);
    serde_json::from_value(raw)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI document: {}", e)))
}

/// Root document.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractDocument {
    /// OpenAPI version.
    pub openapi: Option<String>,
    /// Metadata about the API.
    pub info: Option<ContractInfo>,
    /// Servers.
    #[serde(default)]
    pub servers: Vec<ContractServer>,
    /// Path items.
    #[serde(default)]
    pub paths: ContractPaths,
    /// Reusable components.
    #[serde(default)]
    pub components: Option<ContractComponents>,
    /// `x-` extensions and unmodelled fields.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Info object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractInfo {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Description.
    pub description: Option<String>,
}

/// Server object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractServer {
    /// URL template.
    pub url: String,
    /// Description.
    pub description: Option<String>,
    /// Template variables.
    #[serde(default)]
    pub variables: IndexMap<String, ContractServerVariable>,
}

/// Server variable.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractServerVariable {
    /// Default substitution.
    pub default: String,
    /// Allowed values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    /// Description.
    pub description: Option<String>,
}

/// Paths object; `x-` keys are kept apart from path items.
#[derive(Clone, Default, Debug)]
pub struct ContractPaths {
    /// Path items keyed by template, in document order.
    pub items: IndexMap<String, ContractPathItem>,
    /// Extensions attached to the Paths Object.
    pub extensions: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for ContractPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();
        let mut extensions = BTreeMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                extensions.insert(key, value);
                continue;
            }
            let item = serde_json::from_value::<ContractPathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, item);
        }

        Ok(Self { items, extensions })
    }
}

/// Path item.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractPathItem {
    /// Summary for all operations.
    pub summary: Option<String>,
    /// Description for all operations.
    pub description: Option<String>,
    /// Parameters shared by all operations.
    #[serde(default)]
    pub parameters: Vec<RefOr<ContractParameter>>,
    /// GET
    pub get: Option<ContractOperation>,
    /// PUT
    pub put: Option<ContractOperation>,
    /// POST
    pub post: Option<ContractOperation>,
    /// DELETE
    pub delete: Option<ContractOperation>,
    /// OPTIONS
    pub options: Option<ContractOperation>,
    /// HEAD
    pub head: Option<ContractOperation>,
    /// PATCH
    pub patch: Option<ContractOperation>,
    /// TRACE
    pub trace: Option<ContractOperation>,
}

impl ContractPathItem {
    /// Operations with their lower-case method, in a fixed method order.
    pub fn operations(&self) -> Vec<(&'static str, &ContractOperation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// Operation object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractOperation {
    /// Operation id.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ContractParameter>>,
    /// Request body.
    #[serde(rename = "requestBody")]
    pub request_body: Option<RefOr<ContractRequestBody>>,
    /// Responses by status code.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ContractResponse>>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
}

/// Parameter object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractParameter {
    /// Name.
    pub name: String,
    /// Location (`path`, `query`, `header`, `cookie`).
    #[serde(rename = "in")]
    pub location: String,
    /// Description.
    pub description: Option<String>,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<RefOr<Schema>>,
}

/// Request body object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractRequestBody {
    /// Description.
    pub description: Option<String>,
    /// Content by media type.
    #[serde(default)]
    pub content: IndexMap<String, ContractMediaType>,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
}

/// Media type object.
#[derive(Deserialize, Clone, Default, Debug)]
pub struct ContractMediaType {
    /// Body schema.
    pub schema: Option<RefOr<Schema>>,
}

/// Response object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractResponse {
    /// Description.
    pub description: Option<String>,
    /// Headers.
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<ContractHeader>>,
    /// Content by media type.
    #[serde(default)]
    pub content: IndexMap<String, ContractMediaType>,
}

/// Header object.
#[derive(Deserialize, Clone, Debug)]
pub struct ContractHeader {
    /// Description.
    pub description: Option<String>,
    /// Required flag.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<RefOr<Schema>>,
}

/// Components object.
#[derive(Deserialize, Clone, Default, Debug)]
pub struct ContractComponents {
    /// Schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<Schema>>,
    /// Parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<ContractParameter>>,
    /// Request bodies.
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, RefOr<ContractRequestBody>>,
    /// Responses.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ContractResponse>>,
    /// Headers.
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<ContractHeader>>,
    /// Unmodelled component maps (security schemes, examples, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn resolve_in<'a, T>(
    item: &'a RefOr<T>,
    section: &str,
    lookup: impl Fn(&str) -> Option<&'a RefOr<T>>,
) -> AppResult<&'a T> {
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            RefOr::T(value) => return Ok(value),
            RefOr::Ref(r) => {
                let name = local_component_name(&r.ref_location, section)?;
                current = lookup(&name)
                    .ok_or_else(|| AppError::InvalidReference(r.ref_location.clone()))?;
            }
        }
    }
    Err(AppError::InvalidReference(format!(
        "reference chain in '{}' is too deep",
        section
    )))
}

impl ContractDocument {
    fn components(&self) -> Option<&ContractComponents> {
        self.components.as_ref()
    }

    /// A component schema by name.
    pub fn schema_component(&self, name: &str) -> Option<&RefOr<Schema>> {
        self.components()?.schemas.get(name)
    }

    /// Follows a schema reference chain to the component it names.
    pub fn resolve_schema<'a>(&'a self, schema: &'a RefOr<Schema>) -> AppResult<&'a Schema> {
        resolve_in(schema, "schemas", |name| self.schema_component(name))
    }

    /// Resolves a parameter reference.
    pub fn resolve_parameter<'a>(
        &'a self,
        param: &'a RefOr<ContractParameter>,
    ) -> AppResult<&'a ContractParameter> {
        resolve_in(param, "parameters", |name| {
            self.components()?.parameters.get(name)
        })
    }

    /// Resolves a request body reference.
    pub fn resolve_request_body<'a>(
        &'a self,
        body: &'a RefOr<ContractRequestBody>,
    ) -> AppResult<&'a ContractRequestBody> {
        resolve_in(body, "requestBodies", |name| {
            self.components()?.request_bodies.get(name)
        })
    }

    /// Resolves a response reference.
    pub fn resolve_response<'a>(
        &'a self,
        response: &'a RefOr<ContractResponse>,
    ) -> AppResult<&'a ContractResponse> {
        resolve_in(response, "responses", |name| {
            self.components()?.responses.get(name)
        })
    }

    /// Resolves a header reference.
    pub fn resolve_header<'a>(
        &'a self,
        header: &'a RefOr<ContractHeader>,
    ) -> AppResult<&'a ContractHeader> {
        resolve_in(header, "headers", |name| self.components()?.headers.get(name))
    }

    /// Path-level and operation-level parameters, operation entries
    /// overriding path entries with the same name and location.
    pub fn effective_parameters<'a>(
        &'a self,
        item: &'a ContractPathItem,
        operation: &'a ContractOperation,
    ) -> AppResult<Vec<&'a ContractParameter>> {
        let mut merged: IndexMap<(String, String), &ContractParameter> = IndexMap::new();
        for param in item.parameters.iter().chain(operation.parameters.iter()) {
            let resolved = self.resolve_parameter(param)?;
            merged.insert(
                (resolved.name.clone(), resolved.location.clone()),
                resolved,
            );
        }
        Ok(merged.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::schema::{SchemaType, Type};

    const CONTRACT: &str = r#"
openapi: 3.0.1
info:
  title: Pets
  version: 1.0.0
servers:
  - url: "{scheme}://petstore.io:{port}/v1"
    variables:
      scheme:
        default: https
      port:
        default: "8443"
x-internal: true
paths:
  x-audit: enabled
  /pets/{id}:
    parameters:
      - $ref: '#/components/parameters/Id'
    get:
      operationId: getPet
      tags: [pets]
      parameters:
        - name: verbose
          in: query
          schema:
            type: boolean
            nullable: true
      responses:
        "200":
          description: Ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
        "404":
          $ref: '#/components/responses/NotFound'
components:
  parameters:
    Id:
      name: id
      in: path
      required: true
      schema:
        type: integer
  responses:
    NotFound:
      description: Not found
  schemas:
    Pet:
      type: object
      required: [name]
      properties:
        name:
          type: string
"#;

    #[test]
    fn test_parse_contract_keeps_order_and_extensions() {
        let doc = parse_contract(CONTRACT).unwrap();
        assert_eq!(doc.info.as_ref().unwrap().title, "Pets");
        assert_eq!(doc.paths.items.keys().collect::<Vec<_>>(), vec!["/pets/{id}"]);
        assert!(doc.paths.extensions.contains_key("x-audit"));
        assert!(doc.extensions.contains_key("x-internal"));
        assert_eq!(doc.servers[0].variables["port"].default, "8443");
    }

    #[test]
    fn test_effective_parameters_resolve_components() {
        let doc = parse_contract(CONTRACT).unwrap();
        let item = &doc.paths.items["/pets/{id}"];
        let (method, op) = item.operations()[0];
        assert_eq!(method, "get");

        let params = doc.effective_parameters(item, op).unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "verbose"]);

        let verbose = params[1].schema.as_ref().unwrap();
        match verbose {
            RefOr::T(Schema::Object(obj)) => assert!(matches!(
                &obj.schema_type,
                SchemaType::Array(types) if types.contains(&Type::Null)
            )),
            _ => panic!("expected an inline object schema"),
        }
    }

    #[test]
    fn test_resolve_response_reference() {
        let doc = parse_contract(CONTRACT).unwrap();
        let op = doc.paths.items["/pets/{id}"].get.as_ref().unwrap();
        let not_found = doc.resolve_response(&op.responses["404"]).unwrap();
        assert_eq!(not_found.description.as_deref(), Some("Not found"));
    }

    #[test]
    fn test_unparsable_contract() {
        let err = parse_contract("openapi: [").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
