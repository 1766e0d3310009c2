//! Entity loader
//!
//! Resolves an entity descriptor's component file list, runs a component
//! loader per file, and stages the assembled entity. Staging is pure: the
//! world is only touched when a whole scene batch commits, so a failing
//! entity can never leave a half-built "zombie" behind.

use std::path::PathBuf;

use smallvec::SmallVec;

use super::component::ComponentLoader;
use super::descriptor::{ComponentDescriptor, EntityDescriptor, read_json, sibling_path};
use super::error::LoadError;
use super::registry::{SchemaRegistry, StagedComponent};
use super::task::CancelToken;

/// Component tags attached to one entity, in descriptor order
pub type TagSet = SmallVec<[std::sync::Arc<str>; 8]>;

/// One fully validated entity, waiting for a world identity
#[derive(Debug)]
pub struct StagedEntity {
    /// The entity descriptor this was built from
    pub source: PathBuf,
    components: Vec<StagedComponent>,
}

impl StagedEntity {
    /// Type tags of the staged components, in descriptor order
    #[must_use]
    pub fn type_tags(&self) -> TagSet {
        self.components
            .iter()
            .map(|c| c.type_tag().clone())
            .collect()
    }

    /// Number of staged components
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn into_components(self) -> Vec<StagedComponent> {
        self.components
    }
}

/// Turns one entity descriptor file into a [`StagedEntity`]
#[derive(Debug)]
pub struct EntityLoader<'r> {
    entity_path: PathBuf,
    registry: &'r SchemaRegistry,
}

impl<'r> EntityLoader<'r> {
    /// Create a loader for the entity descriptor at `entity_path`
    #[must_use]
    pub fn new(entity_path: PathBuf, registry: &'r SchemaRegistry) -> Self {
        Self {
            entity_path,
            registry,
        }
    }

    /// Load and validate every listed component, fail-fast.
    ///
    /// Component paths resolve relative to the entity file's own directory.
    /// The cancellation token is checked before each component file read.
    ///
    /// # Errors
    ///
    /// The first failing component aborts the whole entity; already-parsed
    /// components are discarded and the error is wrapped with the component
    /// file's path and then the entity file's path.
    pub fn load(&self, token: &CancelToken) -> Result<StagedEntity, LoadError> {
        self.load_inner(token)
            .map_err(|e| e.at(&self.entity_path))
    }

    fn load_inner(&self, token: &CancelToken) -> Result<StagedEntity, LoadError> {
        token.checkpoint()?;
        let descriptor = EntityDescriptor::from_value(read_json(&self.entity_path)?)?;

        let mut components = Vec::with_capacity(descriptor.components.len());
        for relative in &descriptor.components {
            token.checkpoint()?;
            let component_path = sibling_path(&self.entity_path, relative);
            let staged = self
                .load_component(&component_path)
                .map_err(|e| e.at(&component_path))?;
            components.push(staged);
        }

        log::debug!(
            "staged entity `{}` with {} component(s)",
            self.entity_path.display(),
            components.len()
        );

        Ok(StagedEntity {
            source: self.entity_path.clone(),
            components,
        })
    }

    fn load_component(&self, path: &std::path::Path) -> Result<StagedComponent, LoadError> {
        let descriptor = ComponentDescriptor::from_value(read_json(path)?)?;
        ComponentLoader::new(descriptor, self.registry).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Position, Velocity};
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register::<Position>("Position");
        registry.register::<Velocity>("Velocity");
        registry
    }

    #[test]
    fn test_stages_components_in_descriptor_order() {
        let dir = tempfile::tempdir().unwrap();
        let entity = dir.path().join("entities/mover.json");
        write(
            &entity,
            r#"{ "components": ["../components/pos.json", "../components/vel.json"] }"#,
        );
        write(
            &dir.path().join("components/pos.json"),
            r#"{ "type": "Position", "fields": { "x": 5.0, "y": 5.0 } }"#,
        );
        write(
            &dir.path().join("components/vel.json"),
            r#"{ "type": "Velocity", "fields": { "dx": 1.0, "dy": 0.0 } }"#,
        );

        let registry = registry();
        let staged = EntityLoader::new(entity, &registry)
            .load(&CancelToken::new())
            .unwrap();

        let tags: Vec<_> = staged.type_tags().iter().map(|t| t.to_string()).collect();
        assert_eq!(tags, ["Position", "Velocity"]);
    }

    #[test]
    fn test_missing_field_aborts_entity_and_names_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let entity = dir.path().join("broken.json");
        write(
            &entity,
            r#"{ "components": ["ok.json", "missing_y.json"] }"#,
        );
        write(
            &dir.path().join("ok.json"),
            r#"{ "type": "Velocity", "fields": { "dx": 0.0, "dy": 0.0 } }"#,
        );
        write(
            &dir.path().join("missing_y.json"),
            r#"{ "type": "Position", "fields": { "x": 1.0 } }"#,
        );

        let registry = registry();
        let err = EntityLoader::new(entity, &registry)
            .load(&CancelToken::new())
            .unwrap_err();

        let chain = err.chain();
        assert!(chain.contains("broken.json"));
        assert!(chain.contains("missing_y.json"));
        assert!(chain.contains("Position"));
    }

    #[test]
    fn test_cancelled_before_read() {
        let registry = registry();
        let token = CancelToken::new();
        token.cancel();

        let err = EntityLoader::new(PathBuf::from("never/read.json"), &registry)
            .load(&token)
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
