//! Record schemas.
//!
//! Inclusions become `allOf` branches referencing the included component;
//! fields the inclusion already contributes are dropped from the record's own
//! properties unless the record overrides their type.

use super::refs::create_component_mapping;
use super::{synthesize, SchemaContext, SchemaMode};
use crate::diagnostics::DiagnosticCode;
use crate::error::AppResult;
use crate::model::types::{RecordType, TypeDescriptor};
use crate::oas::schema::{AdditionalProperties, Schema};
use indexmap::IndexMap;

pub(super) fn convert(ctx: &mut SchemaContext<'_>, ty: &TypeDescriptor) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Record(record) = ty else {
        return Ok(None);
    };

    let mut inherited: IndexMap<String, TypeDescriptor> = IndexMap::new();
    let mut all_of = Vec::new();

    if ctx.mode == SchemaMode::Referenced {
        let model = ctx.model;
        for inclusion in &record.inclusions {
            let Some(def) = model.resolve(inclusion) else {
                ctx.diagnostics.warn(
                    DiagnosticCode::UnresolvedReference,
                    format!("included type '{}' cannot be resolved", inclusion),
                );
                continue;
            };
            if let TypeDescriptor::Record(included) = &def.ty {
                for (name, field) in &included.fields {
                    inherited.insert(name.clone(), field.ty.clone());
                }
            }
            create_component_mapping(ctx, inclusion)?;
            if let Some(reference) = ctx.registry.reference_schema(&inclusion.name) {
                all_of.push(reference);
            }
        }
    }

    let own = object_schema(ctx, record, &inherited, all_of.is_empty())?;

    if all_of.is_empty() {
        return Ok(Some(own));
    }
    if !own.properties.is_empty() {
        all_of.push(own);
    }
    Ok(Some(Schema {
        all_of,
        ..Schema::default()
    }))
}

fn object_schema(
    ctx: &mut SchemaContext<'_>,
    record: &RecordType,
    inherited: &IndexMap<String, TypeDescriptor>,
    standalone: bool,
) -> AppResult<Schema> {
    let mut schema = Schema::object();

    for (name, field) in &record.fields {
        if inherited.get(name) == Some(&field.ty) {
            continue;
        }
        let Some(mut field_schema) = synthesize(&field.ty, ctx)? else {
            continue;
        };
        if let Some(description) = &field.description {
            field_schema.description = Some(description.clone());
        }
        if !field.optional && !field.has_default {
            schema.required.push(name.clone());
        }
        schema.properties.insert(name.clone(), field_schema);
    }

    // A closed branch inside allOf would reject the included properties.
    if standalone {
        match record.rest.as_deref() {
            None => {
                schema.additional_properties = Some(AdditionalProperties::Flag(false));
            }
            Some(rest) if rest.is_anydata() => {}
            Some(rest) => {
                if let Some(rest_schema) = synthesize(rest, ctx)? {
                    schema.additional_properties =
                        Some(AdditionalProperties::Schema(Box::new(rest_schema)));
                }
            }
        }
    }

    Ok(schema)
}
