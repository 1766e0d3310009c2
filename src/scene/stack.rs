//! Scene stack
//!
//! Ordered stack of live scenes. The top scene is the sole interactive one;
//! pausing is a push and resuming is a pop, so no pause flag threads through
//! lower scenes. Transitions requested during a frame are queued and applied
//! strictly after dispatch, in request order, so a scene never observes the
//! stack shifting under its own call.

use crate::core::Time;
use crate::ecs::{ScenePartition, World};
use crate::input::Input;
use crate::render::RenderQueue;

use super::{PushRequest, Scene, Transition};

/// Whether the stack still has scenes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// Terminal: the driver stops
    Empty,
    /// At least one scene is live
    Running,
}

struct StackEntry {
    scene: Box<dyn Scene>,
    partition: ScenePartition,
    draw_below: bool,
}

/// A push request queued during dispatch, tagged with the stack depth of the
/// scene that requested it
pub(crate) struct QueuedPush {
    pub request: PushRequest,
    pub requester_depth: usize,
}

/// Ordered, mutable stack of scenes
#[derive(Default)]
pub struct SceneStack {
    entries: Vec<StackEntry>,
    queued: Vec<(Transition, usize)>,
}

impl SceneStack {
    /// Create an empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> StackState {
        if self.entries.is_empty() {
            StackState::Empty
        } else {
            StackState::Running
        }
    }

    /// Number of live scenes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scene is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top scene's entity partition, if any scene is live
    #[must_use]
    pub fn top_partition(&self) -> Option<&ScenePartition> {
        self.entries.last().map(|entry| &entry.partition)
    }

    /// Append a fully loaded scene as the new top
    pub fn push_scene(
        &mut self,
        scene: Box<dyn Scene>,
        partition: ScenePartition,
        draw_below: bool,
    ) {
        self.entries.push(StackEntry {
            scene,
            partition,
            draw_below,
        });
    }

    /// Remove and destroy the top scene, deregistering its entities
    pub fn pop(&mut self, world: &mut World) -> StackState {
        if let Some(entry) = self.entries.pop() {
            world.despawn_partition(&entry.partition);
            log::debug!(
                "popped scene, {} deregistered, {} remaining",
                entry.partition.len(),
                self.entries.len()
            );
        }
        self.state()
    }

    /// Draw the top scene and any scenes visible beneath overlays.
    ///
    /// Walks down while each scene above asks for the one below to stay
    /// visible, then draws bottom-up so the top renders last.
    pub fn draw(&self, world: &World, queue: &mut RenderQueue) {
        let Some(top) = self.entries.len().checked_sub(1) else {
            return;
        };
        let mut first = top;
        while first > 0 && self.entries[first].draw_below {
            first -= 1;
        }
        for entry in &self.entries[first..] {
            entry.scene.draw(world, queue);
        }
    }

    /// Update the top scene, queueing any transition it requests
    pub fn update(&mut self, world: &mut World, time: &Time) {
        let depth = self.entries.len();
        if let Some(entry) = self.entries.last_mut() {
            let transition = entry.scene.update(world, time);
            self.queue(transition, depth);
        }
    }

    /// Let the top scene consume input, queueing any transition it requests
    pub fn interact(&mut self, world: &mut World, input: &Input) {
        let depth = self.entries.len();
        if let Some(entry) = self.entries.last_mut() {
            let transition = entry.scene.interact(world, input);
            self.queue(transition, depth);
        }
    }

    fn queue(&mut self, transition: Transition, depth: usize) {
        if !matches!(transition, Transition::None) {
            self.queued.push((transition, depth));
        }
    }

    /// Apply queued transitions in request order.
    ///
    /// Pops take effect immediately; pushes come back to the caller, which
    /// owns scene loading, tagged with the depth their requester sat at so a
    /// later pop of that scene can cancel the load.
    pub(crate) fn apply_transitions(&mut self, world: &mut World) -> Vec<QueuedPush> {
        let mut pushes = Vec::new();
        for (transition, depth) in self.queued.drain(..) {
            match transition {
                Transition::Pop => {
                    if let Some(entry) = self.entries.pop() {
                        world.despawn_partition(&entry.partition);
                        log::debug!("popped scene, {} remaining", self.entries.len());
                    }
                }
                Transition::Push(request) => pushes.push(QueuedPush {
                    request,
                    requester_depth: depth,
                }),
                Transition::None => {}
            }
        }
        pushes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Position;
    use crate::render::{DrawCommand, RenderQueue};
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Records which lifecycle calls reach it; pops itself when told to.
    struct Probe {
        name: &'static str,
        updates: Rc<Cell<u32>>,
        interacts: Rc<Cell<u32>>,
        pop_on_update: bool,
    }

    impl Probe {
        fn new(name: &'static str) -> (Box<Self>, Rc<Cell<u32>>, Rc<Cell<u32>>) {
            let updates = Rc::new(Cell::new(0));
            let interacts = Rc::new(Cell::new(0));
            let probe = Box::new(Self {
                name,
                updates: updates.clone(),
                interacts: interacts.clone(),
                pop_on_update: false,
            });
            (probe, updates, interacts)
        }
    }

    impl Scene for Probe {
        fn draw(&self, _world: &World, queue: &mut RenderQueue) {
            queue.submit(DrawCommand::new(self.name, Vec2::ZERO, Vec2::ONE));
        }

        fn update(&mut self, _world: &mut World, _time: &Time) -> Transition {
            self.updates.set(self.updates.get() + 1);
            if self.pop_on_update {
                Transition::Pop
            } else {
                Transition::None
            }
        }

        fn interact(&mut self, _world: &mut World, _input: &Input) -> Transition {
            self.interacts.set(self.interacts.get() + 1);
            Transition::None
        }
    }

    fn partition_of(world: &mut World, count: usize) -> ScenePartition {
        (0..count)
            .map(|i| world.spawn((Position::new(i as f32, 0.0),)))
            .collect()
    }

    #[test]
    fn test_only_top_scene_updates_and_interacts() {
        let mut world = World::new();
        let mut stack = SceneStack::new();
        let time = Time::new();
        let input = Input::new();

        let (a, a_updates, a_interacts) = Probe::new("a");
        let (b, b_updates, b_interacts) = Probe::new("b");
        stack.push_scene(a, ScenePartition::new(), false);
        stack.push_scene(b, ScenePartition::new(), false);

        stack.update(&mut world, &time);
        stack.interact(&mut world, &input);
        stack.apply_transitions(&mut world);

        assert_eq!((a_updates.get(), a_interacts.get()), (0, 0));
        assert_eq!((b_updates.get(), b_interacts.get()), (1, 1));

        stack.pop(&mut world);
        stack.update(&mut world, &time);
        assert_eq!(a_updates.get(), 1);
    }

    #[test]
    fn test_overlay_flag_controls_draw_of_lower_scenes() {
        let world = World::new();
        let mut stack = SceneStack::new();
        let mut queue = RenderQueue::new();

        let (a, ..) = Probe::new("a");
        let (b, ..) = Probe::new("b");
        stack.push_scene(a, ScenePartition::new(), false);
        // Opaque push: only the top draws.
        stack.push_scene(b, ScenePartition::new(), false);

        stack.draw(&world, &mut queue);
        let drawn: Vec<_> = queue.iter().map(|c| c.texture.clone()).collect();
        assert_eq!(drawn, ["b"]);

        // Overlay push: both draw, bottom-up.
        let (c, ..) = Probe::new("c");
        stack.push_scene(c, ScenePartition::new(), true);
        queue.clear();
        stack.draw(&world, &mut queue);
        let drawn: Vec<_> = queue.iter().map(|c| c.texture.clone()).collect();
        assert_eq!(drawn, ["b", "c"]);
    }

    #[test]
    fn test_pop_deregisters_partition_and_leaves_lower_scene_alone() {
        let mut world = World::new();
        let mut stack = SceneStack::new();

        let (a, ..) = Probe::new("a");
        let (b, ..) = Probe::new("b");
        let a_partition = partition_of(&mut world, 2);
        let b_partition = partition_of(&mut world, 3);
        let a_first = a_partition.iter().next().unwrap();

        stack.push_scene(a, a_partition, false);
        stack.push_scene(b, b_partition, false);
        assert_eq!(world.len(), 5);

        let state = stack.pop(&mut world);
        assert_eq!(state, StackState::Running);
        assert_eq!(world.len(), 2);
        assert!(world.contains(a_first));

        assert_eq!(stack.pop(&mut world), StackState::Empty);
        assert!(world.is_empty());
    }

    #[test]
    fn test_transitions_apply_after_dispatch_not_during() {
        let mut world = World::new();
        let mut stack = SceneStack::new();
        let time = Time::new();

        let (mut probe, updates, _) = Probe::new("a");
        probe.pop_on_update = true;
        stack.push_scene(probe, partition_of(&mut world, 1), false);

        stack.update(&mut world, &time);
        // The pop is queued, not yet applied.
        assert_eq!(stack.len(), 1);
        assert_eq!(world.len(), 1);

        let pushes = stack.apply_transitions(&mut world);
        assert!(pushes.is_empty());
        assert_eq!(stack.state(), StackState::Empty);
        assert!(world.is_empty());
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn test_queued_push_carries_requester_depth() {
        let mut world = World::new();
        let mut stack = SceneStack::new();

        struct Pusher;
        impl Scene for Pusher {
            fn draw(&self, _: &World, _: &mut RenderQueue) {}
            fn update(&mut self, _: &mut World, _: &Time) -> Transition {
                Transition::Push(PushRequest::new("scenes/next.json", |_| unreachable!()))
            }
            fn interact(&mut self, _: &mut World, _: &Input) -> Transition {
                Transition::None
            }
        }

        stack.push_scene(Box::new(Pusher), ScenePartition::new(), false);
        stack.update(&mut world, &Time::new());

        let pushes = stack.apply_transitions(&mut world);
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].requester_depth, 1);
        assert_eq!(
            pushes[0].request.scene_path(),
            std::path::Path::new("scenes/next.json")
        );
    }
}
