//! Scenes
//!
//! A scene is one navigable screen: user-implemented behavior over
//! engine-loaded state. Scenes never mutate the stack directly; they return
//! transition requests, and the stack applies them after the frame's
//! dispatch is done.

mod stack;

use std::path::PathBuf;

use crate::core::Time;
use crate::ecs::World;
use crate::input::Input;
use crate::loader::LoadedScene;
use crate::render::RenderQueue;

pub use stack::{SceneStack, StackState};

/// Constructor turning a committed scene load into live behavior
pub type SceneBuilder = Box<dyn FnOnce(LoadedScene) -> Box<dyn Scene>>;

/// One screen's behavior over its loaded entities.
///
/// Lifecycle, called by the scene stack once per frame:
/// - [`draw`](Self::draw) — read-only, may also run for scenes under a
///   translucent overlay;
/// - [`update`](Self::update) — top scene only, scenes beneath are paused;
/// - [`interact`](Self::interact) — top scene only.
pub trait Scene {
    /// Queue this scene's draw commands. Must not mutate simulation state.
    fn draw(&self, world: &World, queue: &mut RenderQueue);

    /// Advance this scene's simulation by one tick
    fn update(&mut self, world: &mut World, time: &Time) -> Transition;

    /// Consume input addressed to this scene
    fn interact(&mut self, world: &mut World, input: &Input) -> Transition;
}

/// A scene's request to change the stack, applied after dispatch
pub enum Transition {
    /// Stay as is
    None,
    /// Load a new scene and push it on success
    Push(PushRequest),
    /// Remove this scene, deregistering its entities
    Pop,
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Push(request) => f.debug_tuple("Push").field(request).finish(),
            Self::Pop => write!(f, "Pop"),
        }
    }
}

/// Everything needed to load and construct one new scene
pub struct PushRequest {
    scene_path: PathBuf,
    draw_below: bool,
    builder: SceneBuilder,
}

impl PushRequest {
    /// Request a push of the scene described at `scene_path`.
    ///
    /// `builder` runs once the descriptor tree has loaded and committed.
    #[must_use]
    pub fn new(
        scene_path: impl Into<PathBuf>,
        builder: impl FnOnce(LoadedScene) -> Box<dyn Scene> + 'static,
    ) -> Self {
        Self {
            scene_path: scene_path.into(),
            draw_below: false,
            builder: Box::new(builder),
        }
    }

    /// Keep drawing the scene(s) beneath this one while it is on top.
    ///
    /// Off by default; a pause menu overlaying gameplay turns it on.
    #[must_use]
    pub fn draw_below(mut self) -> Self {
        self.draw_below = true;
        self
    }

    /// The scene descriptor path to load
    #[must_use]
    pub fn scene_path(&self) -> &std::path::Path {
        &self.scene_path
    }

    pub(crate) fn into_parts(self) -> (PathBuf, SceneBuilder, bool) {
        (self.scene_path, self.builder, self.draw_below)
    }
}

impl std::fmt::Debug for PushRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushRequest")
            .field("scene_path", &self.scene_path)
            .field("draw_below", &self.draw_below)
            .finish_non_exhaustive()
    }
}
