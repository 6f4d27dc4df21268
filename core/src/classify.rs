#![deny(missing_docs)]

//! # Type Classifier
//!
//! Assigns every descriptor one of the kinds handled by the schema
//! converters. References to built-in subtypes (`int:Signed32`,
//! `string:Char`, `xml:Element`, ...) are treated as primitives.

use crate::model::types::{PrimitiveType, TypeDescriptor, TypeRef};
use derive_more::Display;

/// Converter families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeKind {
    /// Primitives, built-in subtypes and anything without a dedicated converter.
    Primitive,
    /// Literal types.
    Singleton,
    /// Arrays.
    Array,
    /// Maps.
    Map,
    /// Records.
    Record,
    /// Tuples.
    Tuple,
    /// Unions.
    Union,
    /// Intersections.
    Intersection,
    /// Named type references.
    TypeReference,
    /// Errors.
    Error,
    /// Tables.
    Table,
    /// Enums.
    Enum,
}

/// Maps a reference to a built-in subtype onto its primitive.
pub fn builtin_primitive(reference: &TypeRef) -> Option<PrimitiveType> {
    let module = reference
        .module
        .strip_prefix("ballerina/")
        .unwrap_or(&reference.module);
    match (module, reference.name.as_str()) {
        ("lang.int", "Signed32") => Some(PrimitiveType::Signed32),
        ("lang.int", "Signed16") => Some(PrimitiveType::Signed16),
        ("lang.int", "Signed8") => Some(PrimitiveType::Signed8),
        ("lang.int", "Unsigned32") => Some(PrimitiveType::Unsigned32),
        ("lang.int", "Unsigned16") => Some(PrimitiveType::Unsigned16),
        ("lang.int", "Unsigned8") => Some(PrimitiveType::Unsigned8),
        ("lang.string", "Char") => Some(PrimitiveType::Char),
        ("lang.xml", "Element" | "Comment" | "ProcessingInstruction" | "Text") => {
            Some(PrimitiveType::Xml)
        }
        _ => None,
    }
}

/// Classifies a descriptor. Pure and total.
pub fn classify(ty: &TypeDescriptor) -> TypeKind {
    match ty {
        TypeDescriptor::Primitive { .. } | TypeDescriptor::Readonly => TypeKind::Primitive,
        TypeDescriptor::Singleton { .. } => TypeKind::Singleton,
        TypeDescriptor::Array { .. } => TypeKind::Array,
        TypeDescriptor::Map { .. } => TypeKind::Map,
        TypeDescriptor::Record(_) => TypeKind::Record,
        TypeDescriptor::Tuple { .. } => TypeKind::Tuple,
        TypeDescriptor::Union { .. } => TypeKind::Union,
        TypeDescriptor::Intersection { .. } => TypeKind::Intersection,
        TypeDescriptor::Reference(r) if builtin_primitive(r).is_some() => TypeKind::Primitive,
        TypeDescriptor::Reference(_) => TypeKind::TypeReference,
        TypeDescriptor::Error { .. } => TypeKind::Error,
        TypeDescriptor::Table { .. } => TypeKind::Table,
        TypeDescriptor::Enum { .. } => TypeKind::Enum,
    }
}

/// The primitive a descriptor of kind [`TypeKind::Primitive`] stands for.
pub fn primitive_of(ty: &TypeDescriptor) -> Option<PrimitiveType> {
    match ty {
        TypeDescriptor::Primitive { name } => Some(*name),
        TypeDescriptor::Reference(r) => builtin_primitive(r),
        _ => None,
    }
}
