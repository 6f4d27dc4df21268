#![deny(missing_docs)]

//! # Interceptor Pipeline
//!
//! Interceptors can answer a request before the resource runs, so their
//! declared return members are part of every resource's response set. They
//! come first, followed by the resource's own members.

use crate::model::catalog::{SemanticModel, WellKnownType};
use crate::model::service::InterceptorPipeline;
use crate::model::types::TypeDescriptor;
use crate::oas::synthesis::flatten_union;

/// Combines interceptor return members with the resource return type.
///
/// `()` and `http:NextService` members of interceptors only mean "continue"
/// and are dropped. Returns the resource type untouched when no interceptor
/// contributes anything.
pub fn effective_return_type(
    pipeline: &InterceptorPipeline,
    resource_return: Option<&TypeDescriptor>,
    model: &dyn SemanticModel,
) -> Option<TypeDescriptor> {
    let mut members: Vec<TypeDescriptor> = Vec::new();

    for interceptor in &pipeline.interceptors {
        let Some(ty) = &interceptor.return_type else {
            continue;
        };
        for member in union_members(ty) {
            if member.is_nil() || model.subtype_of(member, WellKnownType::NextService) {
                continue;
            }
            if !members.contains(member) {
                members.push(member.clone());
            }
        }
    }

    if members.is_empty() {
        return resource_return.cloned();
    }

    match resource_return {
        Some(ty) => {
            for member in union_members(ty) {
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
        }
        // A resource returning nothing still answers 202.
        None => members.push(TypeDescriptor::nil()),
    }

    Some(match members.len() {
        1 => members.remove(0),
        _ => TypeDescriptor::union(members),
    })
}

fn union_members(ty: &TypeDescriptor) -> Vec<&TypeDescriptor> {
    match ty {
        TypeDescriptor::Union { members } => flatten_union(members),
        other => vec![other],
    }
}
