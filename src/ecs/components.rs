//! Built-in components
//!
//! The engine ships a small set of loadable components; games register their
//! own types the same way. Deserialization is strict: missing, extra, or
//! wrongly-typed fields fail the load.

use glam::Vec2;
use serde::Deserialize;

/// 2D position in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a position
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The position as a vector
    #[must_use]
    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move by a delta
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// 2D velocity in world units per update tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    /// Create a velocity
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// The velocity as a vector
    #[must_use]
    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }
}

/// A drawable region of a texture
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sprite {
    /// Texture path handed through to the render backend
    pub texture: String,
    /// Width in world units
    pub w: f32,
    /// Height in world units
    pub h: f32,
}

/// Display text attached to an entity
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Label {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let mut position = Position::new(5.0, 5.0);
        position.translate(Velocity::new(1.0, 0.0).vec());
        assert_eq!(position, Position::new(6.0, 5.0));
    }

    #[test]
    fn test_strict_deserialization() {
        assert!(serde_json::from_str::<Position>(r#"{ "x": 1.0, "y": 2.0 }"#).is_ok());
        // Missing field
        assert!(serde_json::from_str::<Position>(r#"{ "x": 1.0 }"#).is_err());
        // Extra field
        assert!(serde_json::from_str::<Position>(r#"{ "x": 1.0, "y": 2.0, "z": 3.0 }"#).is_err());
    }
}
