#![deny(missing_docs)]

//! # Semantic Model
//!
//! The narrow interface through which the engine reads type symbols, plus an
//! in-memory implementation that can be loaded from JSON.

use crate::error::{AppError, AppResult};
use crate::model::http::{http_module_definitions, HTTP_MODULE};
use crate::model::types::{TypeDefinition, TypeDescriptor, TypeRef};
use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Library types the engine gives special meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum WellKnownType {
    /// `http:StatusCodeResponse`, the supertype of all status records.
    #[display("StatusCodeResponse")]
    StatusCodeResponse,
    /// `http:StatusCodeError`, the supertype of status-carrying errors.
    #[display("StatusCodeError")]
    StatusCodeError,
    /// `http:Response`
    #[display("Response")]
    Response,
    /// `http:ErrorPayload`
    #[display("ErrorPayload")]
    ErrorPayload,
    /// `http:NextService`
    #[display("NextService")]
    NextService,
}

impl WellKnownType {
    /// The reference naming this type.
    pub fn type_ref(self) -> TypeRef {
        TypeRef::new(HTTP_MODULE, self.to_string())
    }
}

/// Read access to resolved type symbols.
pub trait SemanticModel {
    /// Resolves a named type.
    fn resolve(&self, reference: &TypeRef) -> Option<&TypeDefinition>;

    /// Returns true when `ty` is a subtype of the given well-known type.
    fn subtype_of(&self, ty: &TypeDescriptor, well_known: WellKnownType) -> bool;

    /// Returns a descriptor for the well-known type if the project can see it.
    fn lookup_well_known(&self, well_known: WellKnownType) -> Option<TypeDescriptor>;
}

/// In-memory semantic model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    #[serde(with = "definition_list")]
    definitions: IndexMap<TypeRef, TypeDefinition>,
}

mod definition_list {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(
        map: &IndexMap<TypeRef, TypeDefinition>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<IndexMap<TypeRef, TypeDefinition>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<TypeDefinition>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|d| (d.type_ref(), d)).collect())
    }
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog that already knows the `http` module.
    pub fn with_http_module() -> Self {
        let mut catalog = Self::new();
        for def in http_module_definitions() {
            catalog.insert(def);
        }
        catalog
    }

    /// Parses a JSON list of definitions on top of the `http` module.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let defs: Vec<TypeDefinition> = serde_json::from_str(json)
            .map_err(|e| AppError::Parse(format!("Failed to parse type catalog: {}", e)))?;
        let mut catalog = Self::with_http_module();
        catalog.extend(defs);
        Ok(catalog)
    }

    /// Adds (or replaces) a definition.
    pub fn insert(&mut self, definition: TypeDefinition) {
        self.definitions.insert(definition.type_ref(), definition);
    }

    /// Adds several definitions.
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = TypeDefinition>) {
        for def in definitions {
            self.insert(def);
        }
    }

    /// Number of known definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when no definitions are known.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Walks references, readonly intersections and record inclusions
    /// looking for a reference accepted by `hit`.
    fn reaches(
        &self,
        ty: &TypeDescriptor,
        hit: &dyn Fn(&TypeRef) -> bool,
        seen: &mut HashSet<TypeRef>,
    ) -> bool {
        match ty {
            TypeDescriptor::Reference(r) => {
                if hit(r) {
                    return true;
                }
                if !seen.insert(r.clone()) {
                    return false;
                }
                self.resolve(r)
                    .map(|def| self.reaches(&def.ty, hit, seen))
                    .unwrap_or(false)
            }
            TypeDescriptor::Record(rec) => rec.inclusions.iter().any(|inc| {
                self.reaches(&TypeDescriptor::Reference(inc.clone()), hit, seen)
            }),
            TypeDescriptor::Intersection { .. } => ty
                .strip_readonly()
                .map(|inner| self.reaches(inner, hit, seen))
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl SemanticModel for TypeCatalog {
    fn resolve(&self, reference: &TypeRef) -> Option<&TypeDefinition> {
        self.definitions.get(reference)
    }

    fn subtype_of(&self, ty: &TypeDescriptor, well_known: WellKnownType) -> bool {
        let target = well_known.type_ref();
        let hit = |r: &TypeRef| *r == target;
        self.reaches(ty, &hit, &mut HashSet::new())
    }

    fn lookup_well_known(&self, well_known: WellKnownType) -> Option<TypeDescriptor> {
        let target = well_known.type_ref();
        self.definitions
            .contains_key(&target)
            .then_some(TypeDescriptor::Reference(target))
    }
}
