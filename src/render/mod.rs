//! Render boundary
//!
//! The core does not render. Scenes produce draw commands during `draw`, and
//! whatever backend the host wires up drains the queue and presents them.
//! Texture and shader lifetimes are the backend's problem.

use glam::Vec2;

/// Normalized texture sub-rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    /// The whole texture
    pub const FULL: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// One textured quad to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Texture path handle; resolution is up to the backend
    pub texture: String,
    /// Bottom-left corner in world units
    pub position: Vec2,
    /// Quad size in world units
    pub size: Vec2,
    /// Texture region to sample
    pub uv: UvRect,
}

impl DrawCommand {
    /// Create a command covering the full texture
    #[must_use]
    pub fn new(texture: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            texture: texture.into(),
            position,
            size,
            uv: UvRect::FULL,
        }
    }

    /// Restrict the command to a texture sub-rectangle
    #[must_use]
    pub fn with_uv(mut self, uv: UvRect) -> Self {
        self.uv = uv;
        self
    }
}

/// Per-frame queue of draw commands, in submission order
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit one command
    pub fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Iterate over this frame's commands
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Number of queued commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all commands; the host calls this once per frame after presenting
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Whatever presents the frame's draw commands
pub trait RenderBackend {
    /// Present the queued commands
    fn present(&mut self, queue: &RenderQueue);
}
