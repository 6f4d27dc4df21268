#![deny(missing_docs)]

//! # Type Descriptors
//!
//! The read-only view of source-language types consumed by the mapping engine.
//! Descriptors are supplied by a semantic model (or deserialized from the CLI
//! input format, which uses an internal `kind` tag).

use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// `string`
    #[display("string")]
    String,
    /// `string:Char`
    #[display("string:Char")]
    Char,
    /// `byte`
    #[display("byte")]
    Byte,
    /// `int` (64 bit)
    #[display("int")]
    Int,
    /// `int:Signed32`
    #[display("int:Signed32")]
    Signed32,
    /// `int:Signed16`
    #[display("int:Signed16")]
    Signed16,
    /// `int:Signed8`
    #[display("int:Signed8")]
    Signed8,
    /// `int:Unsigned32`
    #[display("int:Unsigned32")]
    Unsigned32,
    /// `int:Unsigned16`
    #[display("int:Unsigned16")]
    Unsigned16,
    /// `int:Unsigned8`
    #[display("int:Unsigned8")]
    Unsigned8,
    /// `decimal`
    #[display("decimal")]
    Decimal,
    /// `float`
    #[display("float")]
    Float,
    /// `boolean`
    #[display("boolean")]
    Boolean,
    /// `json`
    #[display("json")]
    Json,
    /// `xml`
    #[display("xml")]
    Xml,
    /// `()`
    #[display("()")]
    Nil,
    /// `anydata`
    #[display("anydata")]
    Anydata,
    /// `any`
    #[display("any")]
    Any,
    /// `handle`
    #[display("handle")]
    Handle,
    /// `never`
    #[display("never")]
    Never,
}

/// A reference to a named type defined in some module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{module}:{name}")]
pub struct TypeRef {
    /// Module (package) that defines the type.
    pub module: String,
    /// Type name inside the module.
    pub name: String,
}

impl TypeRef {
    /// Creates a new reference.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

/// A single record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// `T name?;`
    #[serde(default)]
    pub optional: bool,
    /// `T name = value;`
    #[serde(default)]
    pub has_default: bool,
    /// Documentation attached to the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// A required field without documentation.
    pub fn required(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            optional: false,
            has_default: false,
            description: None,
        }
    }

    /// An optional (`?`) field without documentation.
    pub fn optional(ty: TypeDescriptor) -> Self {
        Self {
            optional: true,
            ..Self::required(ty)
        }
    }
}

/// A record type.
///
/// `fields` is the flattened view: fields contributed by inclusions are
/// listed alongside the record's own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
    /// Ordered fields.
    #[serde(default)]
    pub fields: IndexMap<String, FieldDescriptor>,
    /// Rest field type. `None` means the record is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<Box<TypeDescriptor>>,
    /// Type inclusions (`*T;`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inclusions: Vec<TypeRef>,
}

/// A source-language type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A built-in primitive.
    Primitive {
        /// The primitive.
        name: PrimitiveType,
    },
    /// A literal type such as `"red"` or `404`.
    Singleton {
        /// Literal value.
        value: Value,
    },
    /// `T[]`
    Array {
        /// Element type.
        element: Box<TypeDescriptor>,
    },
    /// `map<T>`
    Map {
        /// Value type.
        value: Box<TypeDescriptor>,
    },
    /// `record { ... }`
    Record(RecordType),
    /// `[A, B, C...]`
    Tuple {
        /// Positional member types.
        members: Vec<TypeDescriptor>,
        /// Variadic rest member.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest: Option<Box<TypeDescriptor>>,
    },
    /// `A|B`
    Union {
        /// Member types.
        members: Vec<TypeDescriptor>,
    },
    /// `A & B`
    Intersection {
        /// Member types.
        members: Vec<TypeDescriptor>,
    },
    /// A named type.
    Reference(TypeRef),
    /// `error<Detail>`
    Error {
        /// Detail record type.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<Box<TypeDescriptor>>,
    },
    /// `table<Row>`
    Table {
        /// Row type.
        row: Box<TypeDescriptor>,
    },
    /// `enum { A, B }`
    Enum {
        /// Member values.
        members: Vec<String>,
    },
    /// The `readonly` marker used inside intersections.
    Readonly,
}

impl TypeDescriptor {
    /// A primitive type.
    pub fn primitive(name: PrimitiveType) -> Self {
        TypeDescriptor::Primitive { name }
    }

    /// `()`
    pub fn nil() -> Self {
        Self::primitive(PrimitiveType::Nil)
    }

    /// `string`
    pub fn string() -> Self {
        Self::primitive(PrimitiveType::String)
    }

    /// `int`
    pub fn int() -> Self {
        Self::primitive(PrimitiveType::Int)
    }

    /// `anydata`
    pub fn anydata() -> Self {
        Self::primitive(PrimitiveType::Anydata)
    }

    /// A reference to `module:name`.
    pub fn reference(module: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDescriptor::Reference(TypeRef::new(module, name))
    }

    /// `element[]`
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            element: Box::new(element),
        }
    }

    /// `map<value>`
    pub fn map(value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            value: Box::new(value),
        }
    }

    /// `A|B|...`
    pub fn union(members: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Union { members }
    }

    /// A string literal type.
    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeDescriptor::Singleton {
            value: Value::String(value.into()),
        }
    }

    /// Returns the primitive when this is a plain primitive descriptor.
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeDescriptor::Primitive { name } => Some(*name),
            _ => None,
        }
    }

    /// `()` or the `null` literal.
    pub fn is_nil(&self) -> bool {
        match self {
            TypeDescriptor::Primitive { name } => *name == PrimitiveType::Nil,
            TypeDescriptor::Singleton { value } => value.is_null(),
            _ => false,
        }
    }

    /// Plain `anydata`.
    pub fn is_anydata(&self) -> bool {
        self.as_primitive() == Some(PrimitiveType::Anydata)
    }

    /// A union that directly contains `()`.
    pub fn is_nilable(&self) -> bool {
        match self {
            TypeDescriptor::Union { members } => members.iter().any(|m| m.is_nil() || m.is_nilable()),
            other => other.is_nil(),
        }
    }

    /// For `readonly & T` returns `T`.
    pub fn strip_readonly(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Intersection { members } if members.len() == 2 => {
                match (&members[0], &members[1]) {
                    (TypeDescriptor::Readonly, other) | (other, TypeDescriptor::Readonly) => {
                        Some(other)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// A named type definition as resolved by the semantic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type name.
    pub name: String,
    /// Defining module.
    pub module: String,
    /// The referred type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Documentation attached to the definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TypeDefinition {
    /// Creates an undocumented definition.
    pub fn new(module: impl Into<String>, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            ty,
            description: None,
        }
    }

    /// Attaches a documentation string.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The reference that names this definition.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.module.clone(), self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_tagged_descriptor() {
        let value = json!({
            "kind": "union",
            "members": [
                { "kind": "reference", "module": "app", "name": "Pet" },
                { "kind": "primitive", "name": "nil" }
            ]
        });
        let ty: TypeDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(
            ty,
            TypeDescriptor::union(vec![
                TypeDescriptor::reference("app", "Pet"),
                TypeDescriptor::nil()
            ])
        );
        assert!(ty.is_nilable());
    }

    #[test]
    fn test_deserialize_record_fields() {
        let value = json!({
            "kind": "record",
            "fields": {
                "id": { "type": { "kind": "primitive", "name": "int" } },
                "tag": { "type": { "kind": "primitive", "name": "string" }, "optional": true }
            }
        });
        let ty: TypeDescriptor = serde_json::from_value(value).unwrap();
        let TypeDescriptor::Record(rec) = ty else {
            panic!("expected record");
        };
        assert_eq!(rec.fields.keys().collect::<Vec<_>>(), vec!["id", "tag"]);
        assert!(rec.fields["tag"].optional);
        assert!(rec.rest.is_none());
    }

    #[test]
    fn test_sized_int_names() {
        let ty: TypeDescriptor =
            serde_json::from_value(json!({"kind": "primitive", "name": "signed32"})).unwrap();
        assert_eq!(ty.as_primitive(), Some(PrimitiveType::Signed32));
    }

    #[test]
    fn test_strip_readonly() {
        let ty = TypeDescriptor::Intersection {
            members: vec![TypeDescriptor::Readonly, TypeDescriptor::string()],
        };
        assert_eq!(ty.strip_readonly(), Some(&TypeDescriptor::string()));
    }

    #[test]
    fn test_type_ref_display() {
        assert_eq!(TypeRef::new("http", "Ok").to_string(), "http:Ok");
    }
}
