//! Collision detection between the runner and obstacles
//!
//! Plain AABB overlap. The character's hit-box is its visual box shrunk on every
//! side, which keeps near misses from ending a round.

use super::state::{Character, Obstacle, ObstacleKind};
use crate::Rect;

/// The first overlap found in a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub obstacle_id: u32,
    pub kind: ObstacleKind,
    /// Hit the second box of a compound obstacle
    pub twin: bool,
}

/// Character hit-box, inset by `inset` on each side
pub fn character_hitbox(character: &Character, inset: f32) -> Rect {
    character.bounds().inset(inset)
}

/// Scan obstacles in spawn order and report the first one overlapping `hitbox`
pub fn first_collision(hitbox: &Rect, obstacles: &[Obstacle]) -> Option<Collision> {
    obstacles.iter().find_map(|obstacle| {
        obstacle
            .hitboxes()
            .position(|rect| hitbox.overlaps(&rect))
            .map(|index| Collision {
                obstacle_id: obstacle.id,
                kind: obstacle.kind,
                twin: index > 0,
            })
    })
}
