//! Gradle Runner - A pixel-art infinite runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `renderer`: 2D raster drawing of a frame
//! - `platform`: Browser/native platform abstraction (input, storage)
//! - `session`: Per-page game context driving rounds
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::BestScore;
pub use session::{FrameOutcome, Session};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed geometry (not tunable)
pub mod consts {
    /// Largest canvas the game will size itself to
    pub const MAX_ARENA_WIDTH: f32 = 800.0;
    pub const MAX_ARENA_HEIGHT: f32 = 400.0;
    /// Horizontal space left around the canvas by the host page
    pub const VIEWPORT_MARGIN: f32 = 60.0;

    /// Ground line sits this far above the bottom edge
    pub const GROUND_OFFSET: f32 = 110.0;
    /// Standing character's top edge sits this far above the bottom edge
    pub const CHARACTER_BASE_OFFSET: f32 = 150.0;

    /// Character defaults
    pub const CHARACTER_X: f32 = 100.0;
    pub const CHARACTER_WIDTH: f32 = 40.0;
    pub const STAND_HEIGHT: f32 = 40.0;
    pub const DUCK_HEIGHT: f32 = 20.0;
}

/// Axis-aligned rectangle in arena coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Shrink by `margin` on every side
    #[inline]
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            origin: self.origin + Vec2::splat(margin),
            size: self.size - Vec2::splat(2.0 * margin),
        }
    }

    /// Same rectangle moved by `dx` along x
    #[inline]
    pub fn shifted_x(&self, dx: f32) -> Self {
        Self {
            origin: self.origin + Vec2::new(dx, 0.0),
            size: self.size,
        }
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}
