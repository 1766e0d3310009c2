//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod system;
mod world;

pub use components::{Label, Position, Sprite, Velocity};
pub use hecs::Entity;
pub use system::{Movement, System};
pub use world::{ScenePartition, World};
