#![deny(missing_docs)]

//! # Schema to Type Mapping
//!
//! Inverse of the schema synthesizer: OpenAPI schemas become type
//! expressions, and `components.schemas` entries become type definitions.
//!
//! | Schema | Type |
//! |---|---|
//! | `string` (`byte`/`binary`) | `string` (`byte[]`) |
//! | `string` + `enum` | union of string literals |
//! | `integer` | `int` |
//! | `number` (`float`) | `decimal` (`float`) |
//! | `boolean` | `boolean` |
//! | `object` + `properties` | record (`additionalProperties: false` closes it) |
//! | `object` + schema `additionalProperties` | `map<T>` |
//! | `array` | `T[]` |
//! | `oneOf` / `anyOf` | union |
//! | `allOf` | record with inclusions |
//! | `{}` | `anydata` |

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::AppResult;
use crate::generator::naming::{escape_identifier, type_name};
use crate::generator::nodes::{RecordField, RecordNode, TypeDefinitionNode, TypeNode};
use crate::oas::ref_utils::local_component_name;
use crate::oas::shims::ContractDocument;
use std::collections::HashSet;
use utoipa::openapi::schema::{
    AdditionalProperties, ArrayItems, KnownFormat, Object, Schema, SchemaFormat, SchemaType, Type,
};
use utoipa::openapi::RefOr;

/// Coarse shape of a schema, used to vet parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// string, integer, number, boolean or enum.
    Scalar,
    /// Array of scalars.
    ScalarArray,
    /// Array of arrays or objects.
    NestedArray,
    /// Object, map or composition.
    Object,
    /// No constraint.
    Any,
}

/// Maps contract schemas to type expressions.
pub struct TypeResolver<'a> {
    contract: &'a ContractDocument,
    nullable: bool,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver; `nullable` makes every field type optional.
    pub fn new(contract: &'a ContractDocument, nullable: bool) -> Self {
        Self { contract, nullable }
    }

    /// The contract being read.
    pub fn contract(&self) -> &'a ContractDocument {
        self.contract
    }

    /// True when every field and parameter type is made nilable.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Type expression for a schema or schema reference.
    pub fn type_of(&self, schema: &RefOr<Schema>) -> AppResult<TypeNode> {
        match schema {
            RefOr::Ref(r) => {
                let name = local_component_name(&r.ref_location, "schemas")?;
                Ok(TypeNode::named(type_name(&name)))
            }
            RefOr::T(schema) => self.type_of_schema(schema),
        }
    }

    fn type_of_schema(&self, schema: &Schema) -> AppResult<TypeNode> {
        match schema {
            Schema::Object(obj) => self.type_of_object(obj),
            Schema::Array(arr) => {
                let element = match &arr.items {
                    ArrayItems::RefOrSchema(items) => self.type_of(items)?,
                    _ => TypeNode::named("anydata"),
                };
                let ty = TypeNode::array(element);
                Ok(if admits_null(&arr.schema_type) {
                    ty.optional()
                } else {
                    ty
                })
            }
            Schema::OneOf(one_of) => self.type_of_members(&one_of.items),
            Schema::AnyOf(any_of) => self.type_of_members(&any_of.items),
            Schema::AllOf(all_of) => match all_of.items.as_slice() {
                [single] => self.type_of(single),
                items => Ok(TypeNode::Record(self.record_of_all_of(items)?)),
            },
            _ => Ok(TypeNode::named("anydata")),
        }
    }

    /// Union of members; a `{type: null}` member makes the union optional.
    fn type_of_members(&self, items: &[RefOr<Schema>]) -> AppResult<TypeNode> {
        let mut members = Vec::new();
        let mut nilable = false;
        for item in items {
            if is_null_schema(item) {
                nilable = true;
                continue;
            }
            members.push(self.type_of(item)?);
        }
        if members.is_empty() {
            return Ok(TypeNode::named("()"));
        }
        let ty = TypeNode::union(members);
        Ok(if nilable { ty.optional() } else { ty })
    }

    fn type_of_object(&self, obj: &Object) -> AppResult<TypeNode> {
        let (base, nilable) = match &obj.schema_type {
            SchemaType::Type(t) => (Some(t.clone()), false),
            SchemaType::Array(types) => {
                let non_null: Vec<&Type> = types.iter().filter(|t| **t != Type::Null).collect();
                let nilable = non_null.len() < types.len();
                match non_null.as_slice() {
                    [single] => (Some((*single).clone()), nilable),
                    [] => (Some(Type::Null), false),
                    many => {
                        let members = many
                            .iter()
                            .map(|t| self.type_of_primitive(t, obj))
                            .collect::<AppResult<Vec<_>>>()?;
                        let ty = TypeNode::union(members);
                        return Ok(if nilable { ty.optional() } else { ty });
                    }
                }
            }
            _ => (None, false),
        };

        let ty = match base {
            Some(t) => self.type_of_primitive(&t, obj)?,
            None if !obj.properties.is_empty() || obj.additional_properties.is_some() => {
                self.type_of_record_like(obj)?
            }
            None => TypeNode::named("anydata"),
        };
        Ok(if nilable { ty.optional() } else { ty })
    }

    fn type_of_primitive(&self, t: &Type, obj: &Object) -> AppResult<TypeNode> {
        Ok(match t {
            Type::String => {
                if let Some(values) = obj.enum_values.as_ref().filter(|v| !v.is_empty()) {
                    let mut literals = Vec::new();
                    let mut nilable = false;
                    for value in values {
                        match value.as_str() {
                            Some(s) => literals.push(TypeNode::Literal(s.to_string())),
                            None if value.is_null() => nilable = true,
                            None => literals.push(TypeNode::Literal(value.to_string())),
                        }
                    }
                    let ty = TypeNode::union(literals);
                    return Ok(if nilable { ty.optional() } else { ty });
                }
                match &obj.format {
                    Some(SchemaFormat::KnownFormat(KnownFormat::Byte))
                    | Some(SchemaFormat::KnownFormat(KnownFormat::Binary)) => {
                        TypeNode::named("byte[]")
                    }
                    _ => TypeNode::named("string"),
                }
            }
            Type::Integer => TypeNode::named("int"),
            Type::Number => match &obj.format {
                Some(SchemaFormat::KnownFormat(KnownFormat::Float)) => TypeNode::named("float"),
                _ => TypeNode::named("decimal"),
            },
            Type::Boolean => TypeNode::named("boolean"),
            Type::Array => TypeNode::array(TypeNode::named("json")),
            Type::Object => self.type_of_record_like(obj)?,
            Type::Null => TypeNode::named("()"),
        })
    }

    /// Records, maps and free-form objects.
    fn type_of_record_like(&self, obj: &Object) -> AppResult<TypeNode> {
        if obj.properties.is_empty() {
            if let Some(additional) = &obj.additional_properties {
                if let AdditionalProperties::RefOr(value) = additional.as_ref() {
                    return Ok(TypeNode::map(self.type_of(value)?));
                }
            }
        }
        Ok(TypeNode::Record(self.record_of_object(obj)?))
    }

    /// Record body of an object schema.
    ///
    /// Properties listed in `required` become mandatory fields; all others
    /// are optional. `additionalProperties: false` closes the record, a schema
    /// closes it with a rest field.
    pub fn record_of_object(&self, obj: &Object) -> AppResult<RecordNode> {
        let mut record = RecordNode::default();
        for (name, prop) in &obj.properties {
            let mut ty = self.type_of(prop)?;
            if self.nullable {
                ty = ty.optional();
            }
            record.fields.push(RecordField {
                name: escape_identifier(name),
                ty,
                optional: !obj.required.contains(name),
                doc: description_of(prop),
            });
        }

        match obj.additional_properties.as_deref() {
            Some(AdditionalProperties::FreeForm(false)) => record.closed = true,
            Some(AdditionalProperties::RefOr(rest)) => {
                record.closed = true;
                record.rest = Some(Box::new(self.type_of(rest)?));
            }
            _ => {}
        }
        Ok(record)
    }

    /// `allOf` members: references become inclusions, inline objects
    /// contribute fields.
    fn record_of_all_of(&self, items: &[RefOr<Schema>]) -> AppResult<RecordNode> {
        let mut record = RecordNode::default();
        for item in items {
            match item {
                RefOr::Ref(r) => {
                    let name = local_component_name(&r.ref_location, "schemas")?;
                    record.inclusions.push(type_name(&name));
                }
                RefOr::T(Schema::Object(obj)) => {
                    let own = self.record_of_object(obj)?;
                    record.fields.extend(own.fields);
                    record.closed |= own.closed;
                    if own.rest.is_some() {
                        record.rest = own.rest;
                    }
                }
                RefOr::T(Schema::AllOf(nested)) => {
                    let inner = self.record_of_all_of(&nested.items)?;
                    record.inclusions.extend(inner.inclusions);
                    record.fields.extend(inner.fields);
                }
                RefOr::T(_) => {}
            }
        }
        Ok(record)
    }

    /// Coarse shape of a schema, following references.
    ///
    /// A component met again while its own shape is being computed counts as
    /// an object, so self-referential arrays come out as `NestedArray`.
    pub fn shape_of(&self, schema: &RefOr<Schema>) -> AppResult<SchemaShape> {
        self.shape_within(schema, &mut HashSet::new())
    }

    fn shape_within(
        &self,
        schema: &RefOr<Schema>,
        visiting: &mut HashSet<String>,
    ) -> AppResult<SchemaShape> {
        if let RefOr::Ref(r) = schema {
            let name = local_component_name(&r.ref_location, "schemas")?;
            if !visiting.insert(name) {
                return Ok(SchemaShape::Object);
            }
        }

        let resolved = self.contract.resolve_schema(schema)?;
        Ok(match resolved {
            Schema::Array(arr) => match &arr.items {
                ArrayItems::RefOrSchema(items) => match self.shape_within(items, visiting)? {
                    SchemaShape::Scalar => SchemaShape::ScalarArray,
                    SchemaShape::Any => SchemaShape::ScalarArray,
                    _ => SchemaShape::NestedArray,
                },
                _ => SchemaShape::ScalarArray,
            },
            Schema::Object(obj) => {
                let types: Vec<Type> = match &obj.schema_type {
                    SchemaType::Type(t) => vec![t.clone()],
                    SchemaType::Array(types) => {
                        types.iter().filter(|t| **t != Type::Null).cloned().collect()
                    }
                    _ => Vec::new(),
                };
                match types.as_slice() {
                    [Type::Object] => SchemaShape::Object,
                    [Type::Array] => SchemaShape::NestedArray,
                    [] if !obj.properties.is_empty() => SchemaShape::Object,
                    [] => SchemaShape::Any,
                    _ => SchemaShape::Scalar,
                }
            }
            Schema::AnyOf(any_of) => self.shape_of_members(&any_of.items, visiting)?,
            Schema::OneOf(one_of) => self.shape_of_members(&one_of.items, visiting)?,
            _ => SchemaShape::Object,
        })
    }

    /// Nullable wrappers (`anyOf: [T, {type: null}]`) take the shape of `T`.
    fn shape_of_members(
        &self,
        items: &[RefOr<Schema>],
        visiting: &mut HashSet<String>,
    ) -> AppResult<SchemaShape> {
        let non_null: Vec<&RefOr<Schema>> = items.iter().filter(|i| !is_null_schema(i)).collect();
        match non_null.as_slice() {
            [single] => self.shape_within(single, visiting),
            _ => Ok(SchemaShape::Object),
        }
    }

    /// Type definitions for every `components.schemas` entry.
    ///
    /// A definition that cannot be read is skipped with a diagnostic.
    pub fn component_definitions(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Vec<TypeDefinitionNode> {
        let Some(components) = &self.contract.components else {
            return Vec::new();
        };

        let mut definitions = Vec::new();
        for (name, schema) in &components.schemas {
            let ty = match schema {
                RefOr::T(Schema::Object(obj)) if is_record_schema(obj) => {
                    self.record_of_object(obj).map(TypeNode::Record)
                }
                RefOr::T(Schema::AllOf(all_of)) if all_of.items.len() > 1 => {
                    self.record_of_all_of(&all_of.items).map(TypeNode::Record)
                }
                other => self.type_of(other),
            };
            match ty {
                Ok(ty) => definitions.push(TypeDefinitionNode {
                    name: type_name(name),
                    ty,
                    doc: description_of(schema),
                }),
                Err(e) => diagnostics.warn(
                    DiagnosticCode::UnresolvedReference,
                    format!("schema '{}' skipped: {}", name, e),
                ),
            }
        }
        definitions
    }
}

/// Object schemas that define a record rather than a map or a scalar.
fn is_record_schema(obj: &Object) -> bool {
    let map_like = obj.properties.is_empty()
        && matches!(
            obj.additional_properties.as_deref(),
            Some(AdditionalProperties::RefOr(_))
        );
    let object_typed = match &obj.schema_type {
        SchemaType::Type(t) => *t == Type::Object,
        SchemaType::Array(_) => false,
        _ => !obj.properties.is_empty(),
    };
    object_typed && !map_like
}

fn admits_null(schema_type: &SchemaType) -> bool {
    matches!(schema_type, SchemaType::Array(types) if types.contains(&Type::Null))
}

fn is_null_schema(schema: &RefOr<Schema>) -> bool {
    matches!(
        schema,
        RefOr::T(Schema::Object(obj)) if matches!(obj.schema_type, SchemaType::Type(Type::Null))
    )
}

fn description_of(schema: &RefOr<Schema>) -> Option<String> {
    match schema {
        RefOr::T(Schema::Object(obj)) => obj.description.clone(),
        RefOr::T(Schema::Array(arr)) => arr.description.clone(),
        RefOr::T(Schema::AllOf(all_of)) => all_of.description.clone(),
        RefOr::T(Schema::OneOf(one_of)) => one_of.description.clone(),
        _ => None,
    }
}
