//! Named type references, components and errors.

use super::primitives;
use super::{synthesize, SchemaContext, SchemaMode};
use crate::classify::builtin_primitive;
use crate::diagnostics::DiagnosticCode;
use crate::error::{AppError, AppResult};
use crate::model::catalog::{SemanticModel, WellKnownType};
use crate::model::types::{TypeDescriptor, TypeRef};
use crate::oas::schema::Schema;
use std::collections::HashSet;
use tracing::debug;

/// Registers the component for `reference` unless its name was already visited.
///
/// The slot is marked `InProgress` before the referred type is synthesized
/// and ends up `Resolved` or `Unresolved`.
pub fn create_component_mapping(ctx: &mut SchemaContext<'_>, reference: &TypeRef) -> AppResult<()> {
    let name = reference.name.as_str();
    if ctx.registry.contains(name) {
        return Ok(());
    }

    let model = ctx.model;
    let Some(def) = model.resolve(reference) else {
        ctx.diagnostics.warn(
            DiagnosticCode::UnresolvedReference,
            format!("type '{}' cannot be resolved", reference),
        );
        ctx.registry.mark_unresolved(name);
        return Ok(());
    };

    ctx.registry.begin(name);
    debug!(component = name, module = %def.module, "Mapping component");

    match synthesize(&def.ty, ctx) {
        Ok(Some(mut schema)) => {
            if let Some(description) = &def.description {
                schema.description = Some(description.clone());
            }
            ctx.registry.resolve(name, schema);
            if ctx.source_extensions {
                ctx.registry.add_extension(name, &def.module);
            }
            Ok(())
        }
        Ok(None) => {
            ctx.registry.mark_unresolved(name);
            Ok(())
        }
        Err(e) => {
            ctx.registry.mark_unresolved(name);
            Err(e)
        }
    }
}

pub(super) fn convert_reference(
    ctx: &mut SchemaContext<'_>,
    ty: &TypeDescriptor,
) -> AppResult<Option<Schema>> {
    let TypeDescriptor::Reference(reference) = ty else {
        return Ok(None);
    };
    if let Some(primitive) = builtin_primitive(reference) {
        return Ok(primitives::primitive_schema(primitive));
    }
    if resolves_to_error(ctx.model, reference) {
        return convert_error(ctx, ty);
    }

    match ctx.mode {
        SchemaMode::Referenced => {
            create_component_mapping(ctx, reference)?;
            Ok(ctx.registry.reference_schema(&reference.name))
        }
        SchemaMode::Expanded => expand(ctx, reference),
    }
}

/// True when the reference names an error type, directly or through aliases.
fn resolves_to_error(model: &dyn SemanticModel, reference: &TypeRef) -> bool {
    let mut seen = HashSet::new();
    let mut current = reference;
    while seen.insert(current) {
        match model.resolve(current).map(|def| &def.ty) {
            Some(TypeDescriptor::Error { .. }) => return true,
            Some(TypeDescriptor::Reference(next)) => current = next,
            _ => return false,
        }
    }
    false
}

fn expand(ctx: &mut SchemaContext<'_>, reference: &TypeRef) -> AppResult<Option<Schema>> {
    if ctx.expansion.iter().any(|name| *name == reference.name) {
        return Err(AppError::RecursiveExpansion(reference.name.clone()));
    }

    let model = ctx.model;
    let Some(def) = model.resolve(reference) else {
        ctx.diagnostics.warn(
            DiagnosticCode::UnresolvedReference,
            format!("type '{}' cannot be resolved", reference),
        );
        return Ok(None);
    };

    ctx.expansion.push(reference.name.clone());
    let result = synthesize(&def.ty, ctx);
    ctx.expansion.pop();

    Ok(result?.map(|mut schema| {
        if let Some(description) = &def.description {
            schema.description = Some(description.clone());
        }
        schema
    }))
}

pub(super) fn convert_error(ctx: &mut SchemaContext<'_>, _ty: &TypeDescriptor) -> AppResult<Option<Schema>> {
    match ctx.model.lookup_well_known(WellKnownType::ErrorPayload) {
        Some(payload) => synthesize(&payload, ctx),
        None => {
            ctx.diagnostics.warn(
                DiagnosticCode::MissingWellKnownType,
                "http:ErrorPayload is not available; errors are described as strings",
            );
            Ok(Some(Schema::string()))
        }
    }
}
