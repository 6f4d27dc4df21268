#![deny(missing_docs)]

//! # Schema Synthesizer
//!
//! Converts type descriptors into OpenAPI schemas. Each [`TypeKind`] has a
//! free-function converter; [`synthesize`] classifies the descriptor and
//! dispatches. Converters recurse through [`synthesize`] and register named
//! types through the component registry held by the [`SchemaContext`].
//!
//! `Ok(None)` means the type has no representation; a diagnostic has been
//! recorded. `Err` is reserved for recursion in [`SchemaMode::Expanded`].

use crate::classify::{classify, TypeKind};
use crate::diagnostics::Diagnostics;
use crate::error::AppResult;
use crate::model::catalog::SemanticModel;
use crate::model::types::TypeDescriptor;
use crate::oas::registry::ComponentRegistry;
use crate::oas::schema::Schema;

mod collections;
mod primitives;
mod records;
mod refs;
mod unions;

pub use refs::create_component_mapping;
pub(crate) use unions::flatten_union;

/// How named types are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaMode {
    /// Named types become components referenced with `$ref`.
    #[default]
    Referenced,
    /// Named types are inlined; recursive types are rejected.
    Expanded,
}

/// State shared by all converters of one mapping run.
pub struct SchemaContext<'a> {
    /// Source of type definitions.
    pub model: &'a dyn SemanticModel,
    /// Components discovered so far.
    pub registry: ComponentRegistry,
    /// Findings recorded so far.
    pub diagnostics: Diagnostics,
    /// Emission mode.
    pub mode: SchemaMode,
    /// Tag components with `x-source-type`.
    pub source_extensions: bool,
    expansion: Vec<String>,
}

impl<'a> SchemaContext<'a> {
    /// Creates a context in referenced mode.
    pub fn new(model: &'a dyn SemanticModel) -> Self {
        Self {
            model,
            registry: ComponentRegistry::new(),
            diagnostics: Diagnostics::new(),
            mode: SchemaMode::Referenced,
            source_extensions: false,
            expansion: Vec::new(),
        }
    }

    /// Switches the emission mode.
    pub fn with_mode(mut self, mode: SchemaMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables the `x-source-type` tag on components.
    pub fn with_source_extensions(mut self, enabled: bool) -> Self {
        self.source_extensions = enabled;
        self
    }

    /// Consumes the context, returning the registry and diagnostics.
    pub fn into_parts(self) -> (ComponentRegistry, Diagnostics) {
        (self.registry, self.diagnostics)
    }
}

type Converter = fn(&mut SchemaContext<'_>, &TypeDescriptor) -> AppResult<Option<Schema>>;

fn converter_for(kind: TypeKind) -> Converter {
    match kind {
        TypeKind::Primitive => primitives::convert,
        TypeKind::Singleton => unions::convert_singleton,
        TypeKind::Array => collections::convert_array,
        TypeKind::Map => collections::convert_map,
        TypeKind::Record => records::convert,
        TypeKind::Tuple => collections::convert_tuple,
        TypeKind::Union => unions::convert_union,
        TypeKind::Intersection => unions::convert_intersection,
        TypeKind::TypeReference => refs::convert_reference,
        TypeKind::Error => refs::convert_error,
        TypeKind::Table => collections::convert_table,
        TypeKind::Enum => unions::convert_enum,
    }
}

/// Synthesizes the schema of a type.
pub fn synthesize(ty: &TypeDescriptor, ctx: &mut SchemaContext<'_>) -> AppResult<Option<Schema>> {
    converter_for(classify(ty))(ctx, ty)
}
