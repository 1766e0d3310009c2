//! Component loader
//!
//! Lowest level of the loader tree. Works on an in-memory descriptor; file
//! I/O happened one level up, in the entity loader.

use super::descriptor::ComponentDescriptor;
use super::error::LoadError;
use super::registry::{SchemaRegistry, StagedComponent};

/// Turns one component descriptor into one staged component value
#[derive(Debug)]
pub struct ComponentLoader<'r> {
    descriptor: ComponentDescriptor,
    registry: &'r SchemaRegistry,
}

impl<'r> ComponentLoader<'r> {
    /// Create a loader for a parsed descriptor
    #[must_use]
    pub fn new(descriptor: ComponentDescriptor, registry: &'r SchemaRegistry) -> Self {
        Self {
            descriptor,
            registry,
        }
    }

    /// Produce exactly one component value, or fail.
    ///
    /// # Errors
    ///
    /// [`SchemaMismatch`](super::error::SchemaMismatch) when the type name is
    /// unregistered or the fields fail validation. A missing field is an
    /// authoring bug that must surface immediately, so nothing is defaulted.
    pub fn load(self) -> Result<StagedComponent, LoadError> {
        let staged = self
            .registry
            .construct(&self.descriptor.type_name, &self.descriptor.fields)?;
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Label;
    use crate::loader::error::SchemaMismatch;
    use serde_json::json;

    #[test]
    fn test_load_produces_one_staged_component() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Label>("Label");

        let descriptor = ComponentDescriptor::from_value(json!({
            "type": "Label",
            "fields": { "text": "hello" }
        }))
        .unwrap();

        let staged = ComponentLoader::new(descriptor, &registry).load().unwrap();
        assert_eq!(&**staged.type_tag(), "Label");
    }

    #[test]
    fn test_unregistered_type_fails_at_load_time() {
        let registry = SchemaRegistry::new();
        let descriptor = ComponentDescriptor::from_value(json!({
            "type": "Label",
            "fields": { "text": "hello" }
        }))
        .unwrap();

        let err = ComponentLoader::new(descriptor, &registry).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::Schema(SchemaMismatch::UnknownType { .. })
        ));
    }
}
