//! A data-driven 2D game engine core
//!
//! This engine provides:
//! - Scene/entity/component construction from JSON descriptor trees
//! - Entity Component System storage via hecs
//! - A scene stack with push/pop navigation and overlay drawing
//! - Background, cancellable scene loading
//! - A game driver for the host's frame loop

pub mod core;
pub mod ecs;
pub mod input;
pub mod loader;
pub mod render;
pub mod scene;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{Driver, FrameOutcome, Time};
    pub use crate::ecs::{
        Entity, Label, Movement, Position, ScenePartition, Sprite, System, Velocity, World,
    };
    pub use crate::input::{Input, Key};
    pub use crate::loader::{
        CancelToken, LoadError, LoadedScene, SceneLoader, SchemaMismatch, SchemaRegistry,
    };
    pub use crate::render::{DrawCommand, RenderBackend, RenderQueue, UvRect};
    pub use crate::scene::{PushRequest, Scene, SceneStack, StackState, Transition};
    pub use glam::Vec2;
}
