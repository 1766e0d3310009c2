//! World wrapper around hecs

use hecs::{Entity, EntityBuilder};

use crate::loader::StagedEntity;

/// The identities one scene loaded.
///
/// A logical partition, not physical isolation: the ids are global, scoped
/// by convention to the scene that created them. The scene stack despawns
/// the partition when its scene is popped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePartition {
    entities: Vec<Entity>,
}

impl ScenePartition {
    /// Create an empty partition
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over the identities, in load order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Whether `entity` belongs to this partition
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of identities in the partition
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the partition is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for ScenePartition {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

/// Game world containing all entities and components.
///
/// Identities are assigned here and only here; loaders stage values and the
/// world takes ownership when a batch commits.
pub struct World {
    /// The underlying hecs world
    inner: hecs::World,
}

impl World {
    /// Create a new empty world
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a staged entity under a fresh identity
    pub fn spawn_staged(&mut self, staged: StagedEntity) -> Entity {
        let mut builder = EntityBuilder::new();
        for component in staged.into_components() {
            component.attach(&mut builder);
        }
        self.inner.spawn(builder.build())
    }

    /// Despawn an entity
    ///
    /// # Errors
    ///
    /// Returns [`hecs::NoSuchEntity`] if the entity is already gone.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Despawn every identity in a scene's partition, in reverse load order.
    ///
    /// Identities a user system already despawned are skipped.
    pub fn despawn_partition(&mut self, partition: &ScenePartition) {
        for entity in partition.entities.iter().rev() {
            if self.inner.despawn(*entity).is_err() {
                log::debug!("partition entity {entity:?} was already despawned");
            }
        }
    }

    /// Get a reference to a component
    ///
    /// # Errors
    ///
    /// Returns [`hecs::ComponentError`] if the entity is gone or lacks `T`.
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    ///
    /// # Errors
    ///
    /// Returns [`hecs::ComponentError`] if the entity is gone or lacks `T`.
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Check if an entity exists
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the number of entities
    #[must_use]
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Query for entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query::<Q>()
    }

    /// Query for entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut::<Q>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
