//! Data-driven construction
//!
//! A recursive tree of loaders turns JSON descriptor files into staged
//! entities: scene loaders run entity loaders, entity loaders run component
//! loaders, and validated results travel upward by value. The world is only
//! written when a completed batch commits, so no partial entity or partial
//! scene is ever observable and any failure can simply be retried.

mod component;
mod descriptor;
mod entity;
mod error;
mod registry;
mod scene;
mod task;

pub use component::ComponentLoader;
pub use descriptor::{
    ComponentDescriptor, EntityDescriptor, SceneDescriptor, SceneMetadata, read_json, sibling_path,
};
pub use entity::{EntityLoader, StagedEntity, TagSet};
pub use error::{LoadError, SchemaMismatch};
pub use registry::{SchemaRegistry, StagedComponent};
pub use scene::{LoadedEntity, LoadedScene, SceneLoader, StagingBatch};
pub use task::{CancelToken, LoadTask};
