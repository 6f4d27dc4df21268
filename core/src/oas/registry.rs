#![deny(missing_docs)]

//! # Component Registry
//!
//! Named-schema arena shared by one mapping run.
//!
//! A name absent from the registry is unvisited. `InProgress` is written
//! before the referred type is synthesized, so a self-referential type finds
//! its own name and emits a `$ref` instead of recursing.

use crate::oas::schema::{Schema, SOURCE_TYPE_EXTENSION};
use indexmap::IndexMap;
use serde_json::Value;

/// State of a named component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSlot {
    /// The referred type is being synthesized.
    InProgress,
    /// Synthesis produced a schema.
    Resolved(Schema),
    /// The type cannot be represented.
    Unresolved,
}

/// Ordered map of component name to slot.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    slots: IndexMap<String, ComponentSlot>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the name was visited, whatever its state.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Current slot of a name.
    pub fn slot(&self, name: &str) -> Option<&ComponentSlot> {
        self.slots.get(name)
    }

    /// True only for `Resolved` names.
    pub fn has_full_mapping(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(ComponentSlot::Resolved(_)))
    }

    /// Marks a name as being synthesized. Returns false if it was already visited.
    pub fn begin(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.slots.insert(name.to_string(), ComponentSlot::InProgress);
        true
    }

    /// Stores the synthesized schema.
    pub fn resolve(&mut self, name: &str, schema: Schema) {
        self.slots
            .insert(name.to_string(), ComponentSlot::Resolved(schema));
    }

    /// Records that the type has no schema.
    pub fn mark_unresolved(&mut self, name: &str) {
        self.slots.insert(name.to_string(), ComponentSlot::Unresolved);
    }

    /// The `$ref` schema to use for a name; `None` when the field must be omitted.
    pub fn reference_schema(&self, name: &str) -> Option<Schema> {
        match self.slots.get(name)? {
            ComponentSlot::InProgress | ComponentSlot::Resolved(_) => {
                Some(Schema::component_ref(name))
            }
            ComponentSlot::Unresolved => None,
        }
    }

    /// Tags a resolved component with the module it came from.
    pub fn add_extension(&mut self, name: &str, module: &str) {
        if let Some(ComponentSlot::Resolved(schema)) = self.slots.get_mut(name) {
            schema.extensions.insert(
                SOURCE_TYPE_EXTENSION.to_string(),
                Value::String(format!("{}:{}", module, name)),
            );
        }
    }

    /// Strips the source-type tag from every component.
    pub fn remove_extensions(&mut self) {
        for slot in self.slots.values_mut() {
            if let ComponentSlot::Resolved(schema) = slot {
                schema.extensions.shift_remove(SOURCE_TYPE_EXTENSION);
            }
        }
    }

    /// Resolved components in registration order.
    pub fn schemas(&self) -> IndexMap<String, Schema> {
        self.slots
            .iter()
            .filter_map(|(name, slot)| match slot {
                ComponentSlot::Resolved(schema) => Some((name.clone(), schema.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of visited names.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing was visited.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state_slots() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.reference_schema("Pet").is_none());

        assert!(registry.begin("Pet"));
        assert!(!registry.begin("Pet"));
        assert!(!registry.has_full_mapping("Pet"));
        assert_eq!(
            registry.reference_schema("Pet"),
            Some(Schema::component_ref("Pet"))
        );

        registry.resolve("Pet", Schema::object());
        assert!(registry.has_full_mapping("Pet"));

        registry.begin("Handle");
        registry.mark_unresolved("Handle");
        assert!(registry.reference_schema("Handle").is_none());
        assert_eq!(registry.schemas().len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_source_type_extension() {
        let mut registry = ComponentRegistry::new();
        registry.begin("Pet");
        registry.resolve("Pet", Schema::object());
        registry.add_extension("Pet", "app");

        let schemas = registry.schemas();
        assert_eq!(
            schemas["Pet"].extensions.get(SOURCE_TYPE_EXTENSION),
            Some(&Value::String("app:Pet".into()))
        );

        registry.remove_extensions();
        assert!(registry.schemas()["Pet"].extensions.is_empty());
    }
}
