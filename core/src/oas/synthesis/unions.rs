//! Unions, intersections, enums and singletons.

use super::{synthesize, SchemaContext};
use crate::diagnostics::DiagnosticCode;
use crate::error::AppResult;
use crate::model::types::TypeDescriptor;
use crate::oas::schema::Schema;
use serde_json::Value;

/// Flattens directly nested unions.
pub(crate) fn flatten_union(members: &[TypeDescriptor]) -> Vec<&TypeDescriptor> {
    let mut out = Vec::new();
    for member in members {
        match member {
            TypeDescriptor::Union { members } => out.extend(flatten_union(members)),
            other => out.push(other),
        }
    }
    out
}

pub(super) fn convert_union(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Union { members } = ty else {
        return Ok(None);
    };

    let members = flatten_union(members);
    let has_nil = members.iter().any(|m| m.is_nil());
    let concrete: Vec<&TypeDescriptor> = members.into_iter().filter(|m| !m.is_nil()).collect();

    if concrete.is_empty() {
        return Ok(Some(Schema::default().nullable()));
    }

    if concrete
        .iter()
        .all(|m| matches!(m, TypeDescriptor::Singleton { .. }))
    {
        return Ok(singleton_enum(ctx, &concrete, has_nil));
    }

    let mut schemas: Vec<Schema> = Vec::new();
    for member in concrete {
        if let Some(schema) = synthesize(member, ctx)? {
            if !schemas.contains(&schema) {
                schemas.push(schema);
            }
        }
    }

    let schema = match schemas.len() {
        0 => return Ok(None),
        1 => {
            let single = schemas.remove(0);
            if !has_nil {
                single
            } else if single.reference.is_some() {
                // $ref siblings are ignored in 3.0, so nullable needs a wrapper.
                Schema {
                    all_of: vec![single],
                    ..Schema::default()
                }
                .nullable()
            } else {
                single.nullable()
            }
        }
        _ => {
            let union = Schema::one_of(schemas);
            if has_nil {
                union.nullable()
            } else {
                union
            }
        }
    };
    Ok(Some(schema))
}

fn singleton_enum(
    ctx: &mut SchemaContext<'_>,
    singletons: &[&TypeDescriptor],
    has_nil: bool,
) -> Option<Schema> {
    let mut values = Vec::with_capacity(singletons.len());
    for singleton in singletons {
        match singleton {
            TypeDescriptor::Singleton {
                value: Value::String(s),
            } => values.push(s.clone()),
            other => {
                ctx.diagnostics.warn(
                    DiagnosticCode::NonStringSingleton,
                    format!(
                        "only string literals can form an enum; found '{:?}'",
                        other
                    ),
                );
                return None;
            }
        }
    }

    let schema = Schema::string_enum(values);
    Some(if has_nil { schema.nullable() } else { schema })
}

pub(super) fn convert_intersection(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    match ty.strip_readonly() {
        Some(inner) => synthesize(inner, ctx),
        None => {
            ctx.diagnostics.warn(
                DiagnosticCode::InvalidIntersection,
                "only 'readonly & T' intersections are supported",
            );
            Ok(None)
        }
    }
}

pub(super) fn convert_enum(_ctx: &mut SchemaContext<'_>, ty: &TypeDescriptor) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Enum { members } = ty else {
        return Ok(None);
    };
    Ok(Some(Schema::string_enum(members.iter().cloned())))
}

pub(super) fn convert_singleton(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    match ty {
        TypeDescriptor::Singleton {
            value: Value::String(s),
        } => Ok(Some(Schema::string_enum([s.clone()]))),
        TypeDescriptor::Singleton { value: Value::Null } => Ok(Some(Schema::default().nullable())),
        other => {
            ctx.diagnostics.warn(
                DiagnosticCode::NonStringSingleton,
                format!("literal type '{:?}' is not supported", other),
            );
            Ok(None)
        }
    }
}
