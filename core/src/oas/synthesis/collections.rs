//! Arrays, maps, tables and tuples.

use super::{synthesize, SchemaContext};
use crate::classify::primitive_of;
use crate::diagnostics::DiagnosticCode;
use crate::error::AppResult;
use crate::model::types::{PrimitiveType, TypeDescriptor};
use crate::oas::schema::{AdditionalProperties, Schema};

pub(super) fn convert_array(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Array { element } = ty else {
        return Ok(None);
    };

    // byte[] travels as a base64 string.
    if primitive_of(element) == Some(PrimitiveType::Byte) {
        return Ok(Some(Schema::string().with_format("byte")));
    }

    Ok(synthesize(element, ctx)?.map(Schema::array))
}

pub(super) fn convert_map(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Map { value } = ty else {
        return Ok(None);
    };

    let mut schema = Schema::object();
    if let Some(value_schema) = synthesize(value, ctx)? {
        schema.additional_properties = Some(AdditionalProperties::Schema(Box::new(value_schema)));
    }
    Ok(Some(schema))
}

pub(super) fn convert_table(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Table { row } = ty else {
        return Ok(None);
    };
    Ok(synthesize(row, ctx)?.map(Schema::array))
}

pub(super) fn convert_tuple(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Tuple { members, rest } = ty else {
        return Ok(None);
    };

    if rest.is_some() {
        ctx.diagnostics.warn(
            DiagnosticCode::UnsupportedTupleRest,
            "tuple rest members are not supported; the rest type is ignored",
        );
    }

    let mut items = Vec::with_capacity(members.len());
    for member in members {
        if let Some(schema) = synthesize(member, ctx)? {
            items.push(schema);
        }
    }
    Ok(Some(Schema::array(Schema::one_of(items))))
}
