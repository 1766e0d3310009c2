//! Game driver
//!
//! Top-level orchestrator bound to the host's frame loop. Owns the world and
//! the scene stack, forwards frame ticks, and owns every scene-loader
//! invocation: the initial one at boot and one per push request after that.
//! Loads run on background tasks and are committed here, on the frame
//! thread, so world writes are naturally serialized and a running frame
//! never waits on an in-flight load.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ecs::World;
use crate::input::Input;
use crate::loader::{CancelToken, LoadError, LoadTask, SceneLoader, SchemaRegistry, StagingBatch};
use crate::render::RenderQueue;
use crate::scene::{PushRequest, SceneBuilder, SceneStack};

use super::Time;

/// What the host loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep delivering frames
    Continue,
    /// The stack is empty and nothing is loading: shut down cleanly
    Exit,
}

/// One scene load in flight
struct PendingScene {
    task: LoadTask<StagingBatch>,
    token: CancelToken,
    builder: SceneBuilder,
    scene_path: PathBuf,
    draw_below: bool,
    /// Stack depth the requesting scene sat at; if the stack shrinks below
    /// this, the requester was popped and the load is no longer wanted.
    owner_depth: usize,
}

/// Top-level orchestrator for the frame loop
pub struct Driver {
    world: World,
    stack: SceneStack,
    registry: Arc<SchemaRegistry>,
    pending: VecDeque<PendingScene>,
    time: Time,
    last_load_error: Option<LoadError>,
}

impl Driver {
    /// Create a driver over a populated schema registry
    #[must_use]
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            world: World::new(),
            stack: SceneStack::new(),
            registry: Arc::new(registry),
            pending: VecDeque::new(),
            time: Time::new(),
            last_load_error: None,
        }
    }

    /// Start loading the initial scene.
    ///
    /// The stack stays empty until the load commits; `frame` keeps returning
    /// [`FrameOutcome::Continue`] while anything is still loading.
    pub fn boot(&mut self, request: PushRequest) {
        log::info!("booting with scene `{}`", request.scene_path().display());
        self.begin_load(request, 0);
    }

    /// Run one frame: draw, update, interact, apply transitions, then
    /// service background loads.
    pub fn frame(&mut self, input: &Input, queue: &mut RenderQueue) -> FrameOutcome {
        self.time.tick();

        if !self.stack.is_empty() {
            self.stack.draw(&self.world, queue);
            self.stack.update(&mut self.world, &self.time);
            self.stack.interact(&mut self.world, input);
            for push in self.stack.apply_transitions(&mut self.world) {
                self.begin_load(push.request, push.requester_depth);
            }
        }

        self.service_pending();

        if self.stack.is_empty() && self.pending.is_empty() {
            log::info!("scene stack empty, exiting");
            FrameOutcome::Exit
        } else {
            FrameOutcome::Continue
        }
    }

    /// The shared world
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The shared world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The live scene stack
    #[must_use]
    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    /// The frame clock
    #[must_use]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Whether any scene load is still in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the most recent scene-load failure, if one occurred.
    ///
    /// A failed load never crashes the driver; the push simply does not
    /// happen and the error chain lands here for display.
    pub fn take_load_error(&mut self) -> Option<LoadError> {
        self.last_load_error.take()
    }

    fn begin_load(&mut self, request: PushRequest, owner_depth: usize) {
        let (scene_path, builder, draw_below) = request.into_parts();
        let token = CancelToken::new();
        let loader = SceneLoader::new(&scene_path, self.registry.clone());
        let task = LoadTask::spawn(&token, move |token| loader.load(token));

        log::debug!("scene load started: `{}`", scene_path.display());
        self.pending.push_back(PendingScene {
            task,
            token,
            builder,
            scene_path,
            draw_below,
            owner_depth,
        });
    }

    /// Poll in-flight loads, committing at most up to the first unfinished
    /// one so pushes land in request order.
    fn service_pending(&mut self) {
        while let Some(mut entry) = self.pending.pop_front() {
            if self.stack.len() < entry.owner_depth {
                entry.token.cancel();
            }
            match entry.task.try_take() {
                None => {
                    self.pending.push_front(entry);
                    break;
                }
                Some(result) => self.finish_load(entry, result),
            }
        }
    }

    fn finish_load(&mut self, entry: PendingScene, result: Result<StagingBatch, LoadError>) {
        match result {
            Ok(batch) => {
                // The load may have finished staging before anyone noticed
                // the requester was popped; the batch was never committed,
                // so dropping it is the whole rollback.
                if entry.token.is_cancelled() || self.stack.len() < entry.owner_depth {
                    log::debug!(
                        "discarding cancelled scene load `{}`",
                        entry.scene_path.display()
                    );
                    return;
                }
                let loaded = batch.commit(&mut self.world);
                let partition = loaded.partition();
                let scene = (entry.builder)(loaded);
                self.stack.push_scene(scene, partition, entry.draw_below);
                log::info!("pushed scene `{}`", entry.scene_path.display());
            }
            Err(error) if error.is_cancelled() => {
                log::debug!("scene load `{}` cancelled", entry.scene_path.display());
            }
            Err(error) => {
                log::error!("scene load failed: {}", error.chain());
                self.last_load_error = Some(error);
            }
        }
    }
}
