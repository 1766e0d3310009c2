//! Core engine module
//!
//! Contains the game driver and the frame clock

mod driver;
mod time;

pub use driver::{Driver, FrameOutcome};
pub use time::Time;
