//! Scene loader
//!
//! Top of the loader tree. Resolves a scene descriptor's entity list, runs
//! the entity loaders concurrently, and produces an all-or-nothing staging
//! batch. The world is only written when the batch commits, which is what
//! makes a failed load invisible from outside and a retry after a fixed
//! descriptor safe.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::ecs::{Entity, ScenePartition, World};

use super::descriptor::{SceneDescriptor, SceneMetadata, read_json, sibling_path};
use super::entity::{EntityLoader, StagedEntity, TagSet};
use super::error::LoadError;
use super::registry::SchemaRegistry;
use super::task::CancelToken;

/// Every staged entity of one successful scene load.
///
/// Holding a batch mutates nothing; dropping it discards the load.
#[derive(Debug)]
pub struct StagingBatch {
    scene_path: PathBuf,
    metadata: SceneMetadata,
    entities: Vec<StagedEntity>,
}

impl StagingBatch {
    /// Number of staged entities
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Assign fresh world identities to every staged entity.
    ///
    /// Infallible and atomic from the caller's perspective: by the time a
    /// batch exists, every descriptor in the tree has already validated.
    pub fn commit(self, world: &mut World) -> LoadedScene {
        let entities: Vec<LoadedEntity> = self
            .entities
            .into_iter()
            .map(|staged| {
                let tags = staged.type_tags();
                let id = world.spawn_staged(staged);
                LoadedEntity { id, tags }
            })
            .collect();

        log::debug!(
            "committed scene `{}`: {} entities",
            self.scene_path.display(),
            entities.len()
        );

        LoadedScene {
            scene_path: self.scene_path,
            metadata: self.metadata,
            entities,
        }
    }
}

/// One live entity produced by a commit: its identity plus component tags
#[derive(Debug, Clone)]
pub struct LoadedEntity {
    /// World identity, scoped by convention to the scene that loaded it
    pub id: Entity,
    /// Component type tags, in descriptor order
    pub tags: TagSet,
}

/// A committed scene load, handed to the scene constructor
#[derive(Debug)]
pub struct LoadedScene {
    /// The scene descriptor this was built from
    pub scene_path: PathBuf,
    /// Scene-level metadata from the descriptor
    pub metadata: SceneMetadata,
    /// Live entities, in descriptor order
    pub entities: Vec<LoadedEntity>,
}

impl LoadedScene {
    /// The identities this scene owns, for deregistration on pop
    #[must_use]
    pub fn partition(&self) -> ScenePartition {
        self.entities.iter().map(|e| e.id).collect()
    }
}

/// Turns one scene descriptor file into a [`StagingBatch`]
#[derive(Debug, Clone)]
pub struct SceneLoader {
    scene_path: PathBuf,
    registry: Arc<SchemaRegistry>,
}

impl SceneLoader {
    /// Create a loader for the scene descriptor at `scene_path`
    #[must_use]
    pub fn new(scene_path: impl Into<PathBuf>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            scene_path: scene_path.into(),
            registry,
        }
    }

    /// Load and validate the whole descriptor tree, fail-fast.
    ///
    /// Sibling entities load concurrently on scoped worker threads, but
    /// success or failure is only decided once **all** of them have
    /// reported. On failure nothing has touched the world, so the same
    /// loader can safely run again after the descriptor is fixed.
    ///
    /// # Errors
    ///
    /// The first failing entity fails the scene; the error chain names the
    /// component file, the entity file, and the scene file.
    pub fn load(&self, token: &CancelToken) -> Result<StagingBatch, LoadError> {
        self.load_inner(token).map_err(|e| e.at(&self.scene_path))
    }

    fn load_inner(&self, token: &CancelToken) -> Result<StagingBatch, LoadError> {
        token.checkpoint()?;
        let descriptor = SceneDescriptor::from_value(read_json(&self.scene_path)?)?;

        token.checkpoint()?;
        let results: Vec<Result<StagedEntity, LoadError>> = thread::scope(|scope| {
            let handles: Vec<_> = descriptor
                .entities
                .iter()
                .map(|relative| {
                    let entity_path = sibling_path(&self.scene_path, relative);
                    let registry = &*self.registry;
                    scope.spawn(move || EntityLoader::new(entity_path, registry).load(token))
                })
                .collect();

            // Wait for every sibling before deciding anything.
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(LoadError::Worker)))
                .collect()
        });

        token.checkpoint()?;
        let mut entities = Vec::with_capacity(results.len());
        for result in results {
            entities.push(result?);
        }

        log::debug!(
            "staged scene `{}`: {} entities",
            self.scene_path.display(),
            entities.len()
        );

        Ok(StagingBatch {
            scene_path: self.scene_path.clone(),
            metadata: descriptor.metadata,
            entities,
        })
    }
}
