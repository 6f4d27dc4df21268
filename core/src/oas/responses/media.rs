//! Default media type of a body type.

use super::{ANY_MEDIA, JSON_MEDIA, OCTET_MEDIA, TEXT_MEDIA, XML_MEDIA};
use crate::classify::primitive_of;
use crate::model::catalog::SemanticModel;
use crate::model::types::{PrimitiveType, TypeDescriptor};
use crate::oas::synthesis::flatten_union;
use std::collections::HashSet;

/// Media type used for a body of type `ty`.
pub fn media_type_of(ty: &TypeDescriptor, model: &dyn SemanticModel) -> &'static str {
    media_type_inner(ty, model, &mut HashSet::new())
}

fn media_type_inner(
    ty: &TypeDescriptor,
    model: &dyn SemanticModel,
    seen: &mut HashSet<String>,
) -> &'static str {
    if let Some(primitive) = primitive_of(ty) {
        return match primitive {
            PrimitiveType::String | PrimitiveType::Char => TEXT_MEDIA,
            PrimitiveType::Xml => XML_MEDIA,
            PrimitiveType::Anydata => ANY_MEDIA,
            _ => JSON_MEDIA,
        };
    }

    match ty {
        TypeDescriptor::Array { element } if primitive_of(element) == Some(PrimitiveType::Byte) => {
            OCTET_MEDIA
        }
        TypeDescriptor::Singleton { value } if value.is_string() => TEXT_MEDIA,
        TypeDescriptor::Enum { .. } => TEXT_MEDIA,
        TypeDescriptor::Union { members } => {
            let mut medias = flatten_union(members)
                .into_iter()
                .filter(|m| !m.is_nil())
                .map(|m| media_type_inner(m, model, seen));
            let Some(first) = medias.next() else {
                return JSON_MEDIA;
            };
            if medias.all(|m| m == first) {
                first
            } else {
                JSON_MEDIA
            }
        }
        TypeDescriptor::Intersection { .. } => ty
            .strip_readonly()
            .map(|inner| media_type_inner(inner, model, seen))
            .unwrap_or(JSON_MEDIA),
        TypeDescriptor::Reference(r) => {
            if !seen.insert(r.to_string()) {
                return JSON_MEDIA;
            }
            model
                .resolve(r)
                .map(|def| media_type_inner(&def.ty, model, seen))
                .unwrap_or(JSON_MEDIA)
        }
        _ => JSON_MEDIA,
    }
}
