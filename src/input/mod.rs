//! Input boundary
//!
//! Device polling lives in the host. Each frame the host feeds events into
//! an [`Input`] snapshot, the top scene consumes it during `interact`, and
//! `end_frame` rolls the per-frame sets over.

use std::collections::HashSet;

/// Engine-level key identifiers, fed by the host's input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    /// Any printable key, by character
    Char(char),
}

/// Input state manager
#[derive(Debug, Default)]
pub struct Input {
    /// Currently held keys
    pressed: HashSet<Key>,
    /// Keys that went down this frame
    just_pressed: HashSet<Key>,
    /// Keys that went up this frame
    just_released: HashSet<Key>,
}

impl Input {
    /// Create an empty input state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down
    pub fn press(&mut self, key: Key) {
        if self.pressed.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    /// Record a key going up
    pub fn release(&mut self, key: Key) {
        if self.pressed.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Whether a key is currently held
    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether a key went down this frame
    #[must_use]
    pub fn just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Whether a key went up this frame
    #[must_use]
    pub fn just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Iterate over currently held keys
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.pressed.iter().copied()
    }

    /// Call at the end of each frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
