#![deny(missing_docs)]

//! # Schema Nodes
//!
//! Mutable OpenAPI 3.0 schema objects produced by the synthesizer.
//!
//! `utoipa` models OpenAPI 3.1 and has no `nullable` keyword, so emitted
//! documents use this serde model instead. Contracts read back in are parsed
//! with `utoipa` after nullable normalization.

use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of every component schema reference.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Vendor extension carrying the source type of a component.
pub const SOURCE_TYPE_EXTENSION: &str = "x-source-type";

/// Value of the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// `string`
    #[display("string")]
    String,
    /// `integer`
    #[display("integer")]
    Integer,
    /// `number`
    #[display("number")]
    Number,
    /// `boolean`
    #[display("boolean")]
    Boolean,
    /// `object`
    #[display("object")]
    Object,
    /// `array`
    #[display("array")]
    Array,
}

/// `additionalProperties`: a flag or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` / `false`
    Flag(bool),
    /// A value schema.
    Schema(Box<Schema>),
}

/// A schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref`
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `type`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// `format`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `properties`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// `required`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// `items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// `additionalProperties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// `oneOf`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    /// `allOf`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    /// `nullable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// `enum`
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// `default`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `x-` extensions.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// `{type: <ty>}`
    pub fn of_type(ty: SchemaType) -> Self {
        Self {
            schema_type: Some(ty),
            ..Self::default()
        }
    }

    /// `{type: string}`
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// `{type: object}`
    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    /// `{type: array, items: <items>}`
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type(SchemaType::Array)
        }
    }

    /// `{type: string, enum: [...]}`
    pub fn string_enum(values: impl IntoIterator<Item = String>) -> Self {
        Self {
            enum_values: values.into_iter().map(Value::String).collect(),
            ..Self::string()
        }
    }

    /// `{$ref: '#/components/schemas/<name>'}`
    pub fn component_ref(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", SCHEMA_REF_PREFIX, name)),
            ..Self::default()
        }
    }

    /// `{oneOf: [...]}`
    pub fn one_of(members: Vec<Schema>) -> Self {
        Self {
            one_of: members,
            ..Self::default()
        }
    }

    /// Sets `format`.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Sets `nullable: true`.
    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    /// `{}`: accepts any value.
    pub fn is_empty(&self) -> bool {
        *self == Schema::default()
    }

    /// A schema holding nothing but `$ref`.
    pub fn is_bare_ref(&self) -> bool {
        self.reference.is_some()
            && Schema {
                reference: None,
                ..self.clone()
            }
            .is_empty()
    }

    /// Component name of a `#/components/schemas/...` reference.
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(SCHEMA_REF_PREFIX))
    }
}
