//! Schema registry
//!
//! Maps component type names, as they appear in component descriptors, to
//! constructors that validate a `fields` object and produce a staged
//! component. The host application populates the registry before any load
//! begins; an unregistered name only fails when a descriptor actually uses
//! it, at load time.

use std::sync::Arc;

use hecs::EntityBuilder;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::SchemaMismatch;

/// One validated component value, not yet attached to any entity.
///
/// The value is type-erased behind the closure so the registry can hold
/// arbitrary user component types; it is communicated by value from loader
/// to world and owned by nobody in between.
pub struct StagedComponent {
    type_tag: Arc<str>,
    attach: Box<dyn FnOnce(&mut EntityBuilder) + Send>,
}

impl StagedComponent {
    /// The registered type name this component was built from
    #[must_use]
    pub fn type_tag(&self) -> &Arc<str> {
        &self.type_tag
    }

    /// Move the component value into an entity builder
    pub fn attach(self, builder: &mut EntityBuilder) {
        (self.attach)(builder);
    }
}

impl std::fmt::Debug for StagedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedComponent")
            .field("type_tag", &self.type_tag)
            .finish_non_exhaustive()
    }
}

type Constructor = Box<dyn Fn(&Value) -> Result<StagedComponent, SchemaMismatch> + Send + Sync>;

/// Registry of component schemas, shared with background load tasks
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: FxHashMap<String, Constructor>,
}

impl SchemaRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `type_name`.
    ///
    /// Decoding is strict: a missing required field or a value of the wrong
    /// type is a [`SchemaMismatch::Fields`], never silently defaulted. Types
    /// deriving `Deserialize` with `deny_unknown_fields` also reject stray
    /// fields, which is what the built-in components do.
    pub fn register<T>(&mut self, type_name: &str)
    where
        T: hecs::Component + DeserializeOwned,
    {
        let tag: Arc<str> = type_name.into();
        self.schemas.insert(
            type_name.to_owned(),
            Box::new(move |fields| {
                let value: T =
                    serde_json::from_value(fields.clone()).map_err(|source| {
                        SchemaMismatch::Fields {
                            type_name: tag.to_string(),
                            source,
                        }
                    })?;
                let tag = tag.clone();
                Ok(StagedComponent {
                    type_tag: tag,
                    attach: Box::new(move |builder| {
                        builder.add(value);
                    }),
                })
            }),
        );
    }

    /// Register the built-in components under their canonical names
    pub fn register_builtin(&mut self) {
        use crate::ecs::{Label, Position, Sprite, Velocity};
        self.register::<Position>("Position");
        self.register::<Velocity>("Velocity");
        self.register::<Sprite>("Sprite");
        self.register::<Label>("Label");
    }

    /// Validate `fields` against the schema registered for `type_name`
    ///
    /// # Errors
    ///
    /// [`SchemaMismatch::UnknownType`] for an unregistered name,
    /// [`SchemaMismatch::Fields`] when the fields fail validation.
    pub fn construct(
        &self,
        type_name: &str,
        fields: &Value,
    ) -> Result<StagedComponent, SchemaMismatch> {
        let build = self
            .schemas
            .get(type_name)
            .ok_or_else(|| SchemaMismatch::UnknownType {
                type_name: type_name.to_owned(),
            })?;
        build(fields)
    }

    /// Whether a schema is registered under `type_name`
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    /// Number of registered schemas
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Position, Velocity};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register::<Position>("Position");
        registry.register::<Velocity>("Velocity");
        registry
    }

    #[test]
    fn test_construct_and_attach() {
        let staged = registry()
            .construct("Position", &json!({ "x": 5.0, "y": 5.0 }))
            .unwrap();
        assert_eq!(&**staged.type_tag(), "Position");

        let mut builder = EntityBuilder::new();
        staged.attach(&mut builder);
        let mut world = hecs::World::new();
        let entity = world.spawn(builder.build());

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(*position, Position { x: 5.0, y: 5.0 });
    }

    #[test]
    fn test_unknown_type() {
        let err = registry().construct("Ghost", &json!({})).unwrap_err();
        assert!(matches!(err, SchemaMismatch::UnknownType { type_name } if type_name == "Ghost"));
    }

    #[test]
    fn test_missing_field_is_not_defaulted() {
        let err = registry()
            .construct("Position", &json!({ "x": 1.0 }))
            .unwrap_err();
        assert!(matches!(err, SchemaMismatch::Fields { .. }));
    }

    #[test]
    fn test_extra_field_rejected() {
        let err = registry()
            .construct("Velocity", &json!({ "dx": 1.0, "dy": 0.0, "dz": 0.0 }))
            .unwrap_err();
        assert!(matches!(err, SchemaMismatch::Fields { .. }));
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let err = registry()
            .construct("Position", &json!({ "x": "one", "y": 2.0 }))
            .unwrap_err();
        assert!(matches!(err, SchemaMismatch::Fields { .. }));
    }
}
