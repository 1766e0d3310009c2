//! System trait
//!
//! User-supplied simulation logic. The engine never implements game rules;
//! scenes run their systems during `update`, against the world's query
//! interface.

use super::World;

/// A unit of simulation logic run over the world's components
pub trait System {
    /// Advance the simulation one tick
    fn run(&mut self, world: &mut World);
}

/// Adds each entity's velocity to its position, once per tick.
///
/// The reference implementation of a [`System`]; games usually bring their
/// own.
#[derive(Debug, Default)]
pub struct Movement;

impl System for Movement {
    fn run(&mut self, world: &mut World) {
        use crate::ecs::{Position, Velocity};
        for (_, (position, velocity)) in world.query_mut::<(&mut Position, &Velocity)>() {
            position.translate(velocity.vec());
        }
    }
}
