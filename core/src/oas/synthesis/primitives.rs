//! Primitive and built-in subtype schemas.

use super::SchemaContext;
use crate::classify::primitive_of;
use crate::diagnostics::DiagnosticCode;
use crate::error::AppResult;
use crate::model::types::{PrimitiveType, TypeDescriptor};
use crate::oas::schema::{Schema, SchemaType};

/// Schema of a primitive, `None` for types with no wire representation.
pub(crate) fn primitive_schema(primitive: PrimitiveType) -> Option<Schema> {
    let schema = match primitive {
        PrimitiveType::String | PrimitiveType::Char => Schema::string(),
        PrimitiveType::Byte => Schema::string().with_format("byte"),
        PrimitiveType::Int => Schema::of_type(SchemaType::Integer).with_format("int64"),
        PrimitiveType::Signed32 => Schema::of_type(SchemaType::Integer).with_format("int32"),
        PrimitiveType::Signed16
        | PrimitiveType::Signed8
        | PrimitiveType::Unsigned32
        | PrimitiveType::Unsigned16
        | PrimitiveType::Unsigned8 => Schema::of_type(SchemaType::Integer),
        PrimitiveType::Decimal => Schema::of_type(SchemaType::Number).with_format("double"),
        PrimitiveType::Float => Schema::of_type(SchemaType::Number).with_format("float"),
        PrimitiveType::Boolean => Schema::of_type(SchemaType::Boolean),
        PrimitiveType::Json | PrimitiveType::Xml => Schema::object(),
        PrimitiveType::Nil => Schema::default().nullable(),
        PrimitiveType::Anydata => Schema::default(),
        PrimitiveType::Any | PrimitiveType::Handle | PrimitiveType::Never => return None,
    };
    Some(schema)
}

pub(super) fn convert(ctx: &mut SchemaContext<'_>, ty: &TypeDescriptor) -> AppResult<Option<Schema>> {
    let Some(primitive) = primitive_of(ty) else {
        ctx.diagnostics.warn(
            DiagnosticCode::UnsupportedType,
            format!("type '{:?}' has no OpenAPI representation", ty),
        );
        return Ok(None);
    };

    let schema = primitive_schema(primitive);
    if schema.is_none() {
        ctx.diagnostics.warn(
            DiagnosticCode::UnsupportedType,
            format!("'{}' values cannot be described in OpenAPI", primitive),
        );
    }
    Ok(schema)
}
